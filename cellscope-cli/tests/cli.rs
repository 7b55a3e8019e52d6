//! Integration tests for the cellscope CLI.
//!
//! These tests write small bag-of-cells files to a temporary directory, invoke the
//! `cellscope` binary as a subprocess and check exit codes and output.

use std::{fs, path::PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Root: PUSHINT_4 10; PUSHREFCONT -> child. Child: RET.
const NESTED: &[u8] = &[
    0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x02, 0x01, 0x00, 0x09, 0x00, 0x01, 0x04, 0x7A, 0x8A,
    0x01, 0x00, 0x04, 0xDB, 0x30,
];

// Root: an undecodable instruction.
const INVALID: &[u8] = &[
    0xB5, 0xEE, 0x9C, 0x72, 0x01, 0x01, 0x01, 0x01, 0x00, 0x04, 0x00, 0x00, 0x04, 0xA9, 0xFF,
];

#[allow(deprecated)]
fn cellscope() -> Command {
    Command::cargo_bin("cellscope").unwrap()
}

fn write_boc(dir: &TempDir, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join("code.boc");
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn no_args_prints_usage() {
    cellscope()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn disasm_prints_program_json() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    let output = cellscope().arg("disasm").arg(&path).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entry = &json["methods"]["2147483647"]["instList"];
    assert_eq!(entry[0]["type"], "PUSHINT_4");
    assert_eq!(entry[0]["x"], 10);
    assert_eq!(entry[1]["type"], "PUSHREFCONT");
    assert_eq!(entry[1]["c"][0]["type"], "RET");
    assert_eq!(entry[1]["c"][0]["location"]["type"], "TvmInstLambdaLocation");
}

#[test]
fn disasm_flatten_drops_locations() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    let output = cellscope()
        .args(["disasm", "--flatten"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entry = &json["methods"]["2147483647"];
    assert_eq!(entry[1]["opcode"], "PUSHREFCONT");
    assert_eq!(entry[1]["operands"]["c"][0]["opcode"], "RET");
    assert!(entry[1].get("location").is_none());
}

#[test]
fn disasm_depth_limit_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    cellscope()
        .args(["disasm", "--max-depth", "1"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("recursion"));
}

#[test]
fn disasm_rejects_unknown_policy() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    cellscope()
        .args(["disasm", "--on-collision", "merge"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn disasm_invalid_code_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, INVALID);

    cellscope()
        .arg("disasm")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid opcode"));
}

#[test]
fn methods_lists_entry() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    cellscope()
        .arg("methods")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2147483647"))
        .stdout(predicate::str::contains("entry"))
        .stdout(predicate::str::contains("1 method(s)"));
}

#[test]
fn methods_json_counts_nested_instructions() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    let output = cellscope()
        .args(["methods", "--json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["count"], 1);
    assert_eq!(json["methods"][0]["instructions"], 2);
    assert_eq!(json["methods"][0]["total"], 3);
}

#[test]
fn cells_dumps_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    cellscope()
        .arg("cells")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("x{7A8A}"))
        .stdout(predicate::str::contains("x{DB30}"));
}

#[test]
fn cells_depth_limit_truncates() {
    let dir = TempDir::new().unwrap();
    let path = write_boc(&dir, NESTED);

    let output = cellscope()
        .args(["cells", "--json", "--depth", "0"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["bits"], 16);
    assert_eq!(json["truncated"], true);
    assert!(json.get("references").is_none());
}

#[test]
fn missing_file_fails() {
    cellscope()
        .args(["disasm", "/nonexistent/code.boc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load bag of cells"));
}
