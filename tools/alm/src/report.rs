//! Text report for one decoded module.
//!
//! The report is built as a list of lines and only printed once it is
//! complete, so a module whose names cannot be resolved prints nothing.

use r2k_object::{ModuleKind, ObjError, ObjectModule};

/// Line printed before and after each module's report.
pub const SEPARATOR: &str = "--------------------";

/// Optional parts of the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// List the string pool after the symbol table.
    pub strings: bool,
}

/// Render the report for `module`, read from the file called `name`.
///
/// # Errors
///
/// Returns [`ObjError::InvalidOffset`] if a reference or symbol names a
/// string outside the string pool.
pub fn render(
    name: &str,
    module: &ObjectModule,
    options: ReportOptions,
) -> Result<Vec<String>, ObjError> {
    let header = &module.header;
    let mut lines = vec![SEPARATOR.to_string()];

    lines.push(match header.kind() {
        ModuleKind::ObjectModule => format!("File {name} is an R2K object module"),
        ModuleKind::LoadModule => format!(
            "File {name} is an R2K load module (entry point {:#010x})",
            header.entry_point
        ),
    });
    lines.push(format!("Module version: {}", header.version_date()));

    for desc in header.sections.descriptors() {
        if desc.value != 0 {
            lines.push(format!(
                "Section {} is {} {} long",
                desc.name(),
                desc.value,
                desc.kind().unit()
            ));
        }
    }

    if !module.relocations.is_empty() {
        lines.push("Relocation information:".to_string());
        for rel in &module.relocations {
            lines.push(format!(
                "   {:#010x} (section {}) type {:#04x}",
                rel.addr, rel.section, rel.reloc_type
            ));
        }
    }

    if !module.references.is_empty() {
        lines.push("Reference information:".to_string());
        for r in &module.references {
            let symbol = module.strings.get(r.symbol_name_offset)?;
            lines.push(format!(
                "   {:#010x} type {:#04x} symbol {symbol}",
                r.addr, r.ref_type
            ));
        }
    }

    if !module.symbols.is_empty() {
        lines.push("Symbol table:".to_string());
        for sym in &module.symbols {
            let symbol = module.strings.get(sym.name_offset)?;
            lines.push(format!(
                "   value {:#010x} flags {:#010x} symbol {symbol}",
                sym.value, sym.flags
            ));
        }
    }

    if options.strings && !module.strings.is_empty() {
        lines.push("String pool:".to_string());
        for (offset, text) in module.strings.strings() {
            lines.push(format!("   {offset:#010x} {text:?}"));
        }
    }

    lines.push(SEPARATOR.to_string());
    Ok(lines)
}
