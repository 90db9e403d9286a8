//! Integration tests for the alm binary.
//!
//! These tests write small module fixtures to a scratch directory and run
//! the compiled `alm` binary against them as a subprocess.

use std::path::PathBuf;
use std::process::{Command, Output};

const SEPARATOR: &str = "--------------------";

/// Scratch directory unique to this test process and `test`.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("alm-{}-{test}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("failed to create scratch directory");
    dir
}

/// Encode a module header followed by `body`.
fn module_bytes(version: u16, entry: u32, sections: [u32; 10], body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0xfaceu16.to_be_bytes());
    buf.extend_from_slice(&version.to_be_bytes());
    buf.extend_from_slice(&[0; 4]);
    buf.extend_from_slice(&entry.to_be_bytes());
    for v in sections {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    buf.extend_from_slice(body);
    buf
}

fn run_alm(args: &[&PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_alm"))
        .args(args)
        .output()
        .expect("failed to execute alm")
}

const JAN_15_2024: u16 = (24 << 9) | (1 << 5) | 15;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn no_arguments_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_alm"))
        .output()
        .expect("failed to execute alm");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr:\n{stderr}");
}

#[test]
fn minimal_object_module_report() {
    let dir = scratch_dir("minimal");
    let path = dir.join("min.obj");
    std::fs::write(&path, module_bytes(JAN_15_2024, 0, [0; 10], &[])).unwrap();

    let output = run_alm(&[&path]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = format!(
        "{SEPARATOR}\nFile {} is an R2K object module\nModule version: 2024/01/15\n{SEPARATOR}\n",
        path.display()
    );
    assert_eq!(stdout, expected);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn load_module_with_tables() {
    let dir = scratch_dir("tables");
    let path = dir.join("prog.out");

    let mut body = vec![0u8; 8]; // text
    body.extend_from_slice(&[0, 0, 0, 4, 1, 2, 0, 0]); // reloc
    body.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 5, 1, 3, 0, 0]); // ref -> "puts"
    body.extend_from_slice(&[0, 0, 0, 0x11, 0, 0x40, 0, 0, 0, 0, 0, 0]); // sym -> "main"
    body.extend_from_slice(b"main\0puts\0\0\0");
    let sections = [8, 0, 0, 0, 0, 0, 1, 1, 1, 10];
    std::fs::write(&path, module_bytes(0, 0x0040_0000, sections, &body)).unwrap();

    let output = run_alm(&[&path]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines[1..],
        [
            format!("File {} is an R2K load module (entry point 0x00400000)", path.display()).as_str(),
            "Module version: 2000/00/00",
            "Section text is 8 bytes long",
            "Section reloc is 1 entries long",
            "Section ref is 1 entries long",
            "Section symtab is 1 entries long",
            "Section strings is 10 bytes long",
            "Relocation information:",
            "   0x00000004 (section 1) type 0x02",
            "Reference information:",
            "   0x00000000 type 0x03 symbol puts",
            "Symbol table:",
            "   value 0x00400000 flags 0x00000011 symbol main",
            SEPARATOR,
        ]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bad_magic_is_skipped_and_next_file_still_reported() {
    let dir = scratch_dir("badmagic");
    let bad = dir.join("bad.obj");
    let good = dir.join("good.obj");
    let mut bytes = module_bytes(0, 0, [0; 10], &[]);
    bytes[0..2].copy_from_slice(&0xbeefu16.to_be_bytes());
    std::fs::write(&bad, bytes).unwrap();
    std::fs::write(&good, module_bytes(JAN_15_2024, 0, [0; 10], &[])).unwrap();

    let output = run_alm(&[&bad, &good]);
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(
        stderr,
        format!(
            "error: {}: not an R2K object module (magic number 0xbeef)\n",
            bad.display()
        )
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("bad.obj"));
    assert_eq!(stdout.lines().count(), 4);
    assert!(stdout.contains("good.obj is an R2K object module"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_skipped() {
    let dir = scratch_dir("missing");
    let missing = dir.join("nope.obj");
    let good = dir.join("good.obj");
    std::fs::write(&good, module_bytes(JAN_15_2024, 0, [0; 10], &[])).unwrap();

    let output = run_alm(&[&missing, &good]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with(&format!("error: {}: cannot read file", missing.display())));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 4);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_file_prints_no_report() {
    let dir = scratch_dir("truncated");
    let path = dir.join("short.obj");
    // Declares three symbols but carries none.
    std::fs::write(&path, module_bytes(0, 0, [0, 0, 0, 0, 0, 0, 0, 0, 3, 0], &[])).unwrap();

    let output = run_alm(&[&path]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("symbol table truncated"), "stderr:\n{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn verbose_diagnostics_stay_off_stdout() {
    let dir = scratch_dir("verbose");
    let path = dir.join("min.obj");
    std::fs::write(&path, module_bytes(JAN_15_2024, 0, [0; 10], &[])).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_alm"))
        .arg("--verbose")
        .arg(&path)
        .output()
        .expect("failed to execute alm");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 4);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("string pool at 0x34"), "stderr:\n{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}
