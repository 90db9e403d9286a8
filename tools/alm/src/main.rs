//! R2K object module lister.
//!
//! Decodes each file named on the command line as an R2K object or load
//! module and prints a report of its header, sections, relocation,
//! reference and symbol tables.
//!
//! Files are independent: a file that cannot be read or decoded is reported
//! on stderr and skipped, and the exit status stays successful. Only a
//! missing file list is fatal.

mod cli;
mod report;
mod verbose;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use r2k_object::ObjectModule;
use report::ReportOptions;
use verbose::vprintln;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.verbose);

    let options = ReportOptions {
        strings: cli.strings,
    };

    let stdout = io::stdout();
    for path in &cli.files {
        match report_file(path, options) {
            Ok(lines) => {
                let mut out = stdout.lock();
                for line in &lines {
                    writeln!(out, "{line}").context("writing report")?;
                }
                out.flush().context("writing report")?;
            }
            Err(err) => eprintln!("error: {}: {err:#}", path.display()),
        }
    }
    Ok(())
}

/// Read, decode and render one module.
fn report_file(path: &Path, options: ReportOptions) -> Result<Vec<String>> {
    let data = std::fs::read(path).context("cannot read file")?;
    vprintln!("{}: {} bytes", path.display(), data.len());

    let module = {
        let _t = verbose::Timer::start("decode");
        ObjectModule::parse(&data)?
    };
    log_module(&module);

    let lines = report::render(&path.display().to_string(), &module, options)?;
    Ok(lines)
}

/// Print decoded header values and region offsets in verbose mode.
fn log_module(module: &ObjectModule) {
    let header = &module.header;
    let layout = &module.layout;
    vprintln!(
        "  magic {:#06x}, version {:#06x}, entry {:#010x}",
        header.magic,
        header.version,
        header.entry_point
    );
    vprintln!("  relocation table at {:#x}", layout.relocation_offset);
    vprintln!("  reference table at {:#x}", layout.reference_offset);
    vprintln!("  symbol table at {:#x}", layout.symbol_offset);
    vprintln!(
        "  string pool at {:#x} ({} bytes, {} strings)",
        layout.string_pool_offset,
        layout.string_pool_size,
        module.strings.offsets().len()
    );
}
