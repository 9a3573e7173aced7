//! Integration tests for the aba-codec CLI.
//!
//! These tests run the actual binary against files written to a temporary
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BATCH_LINE: &str = "0123-345          01WPC       John Doe                  466364Payroll     210915                                        ";
const TRANSACTION_LINE: &str = "1342-342  3244654 500000010000John Doe                        R435564           453-543 45656733Remitter        00000010";
const SUMMARY_LINE: &str = "7999-999            000001000000000100000000000000                        000001                                        ";

const HEADERS_CSV: &str = "bsb,financial_institution,user_name,user_id,description,process_at
123-345,WPC,John Doe,466364,Payroll,210915
";

const TRANSACTIONS_CSV: &str = "bsb,account_number,indicator,transaction_code,amount,account_name,lodgement_reference,trace_bsb,trace_account_number,name_of_remitter,withholding_amount
342-342,3244654,,50,10000,John Doe,R435564,453-543,45656733,Remitter,10
";

/// Write `contents` to `name` inside `dir` and return the path
fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn aba_text(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{}\r\n", l)).collect()
}

fn cmd() -> Command {
    Command::cargo_bin("aba-codec").unwrap()
}

#[test]
fn test_check_reports_batches() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "payments.aba",
        &aba_text(&[BATCH_LINE, TRANSACTION_LINE, SUMMARY_LINE]),
    );

    cmd()
        .arg("check")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "batch,bsb,financial_institution,user_name,description,process_at,count,credit_total,debit_total,net_total",
        ))
        .stdout(predicate::str::contains(
            "1,123-345,WPC,John Doe,Payroll,210915,1,100.00,0.00,100.00",
        ));
}

#[test]
fn test_check_fails_on_mismatched_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        &dir,
        "payments.aba",
        &aba_text(&[BATCH_LINE, TRANSACTION_LINE, TRANSACTION_LINE, SUMMARY_LINE]),
    );

    cmd()
        .arg("check")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("doesn't match calculated summary"));
}

#[test]
fn test_check_strict_rejects_unterminated_batch() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "payments.aba", &aba_text(&[BATCH_LINE, TRANSACTION_LINE]));

    cmd().arg("check").arg(&input).assert().success();

    cmd()
        .arg("check")
        .arg("--strict")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_render_writes_aba_file() {
    let dir = TempDir::new().unwrap();
    let headers = write_file(&dir, "headers.csv", HEADERS_CSV);
    let transactions = write_file(&dir, "transactions.csv", TRANSACTIONS_CSV);

    let assert = cmd()
        .arg("render")
        .arg(&headers)
        .arg(&transactions)
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, aba_text(&[BATCH_LINE, TRANSACTION_LINE, SUMMARY_LINE]));
}

#[test]
fn test_render_fails_on_invalid_transaction() {
    let dir = TempDir::new().unwrap();
    let headers = write_file(&dir, "headers.csv", HEADERS_CSV);
    let transactions = write_file(
        &dir,
        "transactions.csv",
        &TRANSACTIONS_CSV.replace(",50,", ",99,"),
    );

    cmd()
        .arg("render")
        .arg(&headers)
        .arg(&transactions)
        .assert()
        .failure()
        .stderr(predicate::str::contains("transaction_code"));
}

#[test]
fn test_render_fails_without_transactions() {
    let dir = TempDir::new().unwrap();
    let headers = write_file(&dir, "headers.csv", HEADERS_CSV);
    let transactions = write_file(&dir, "transactions.csv", "bsb,amount\n");

    cmd()
        .arg("render")
        .arg(&headers)
        .arg(&transactions)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no transactions"));
}

#[test]
fn test_missing_file_error() {
    cmd()
        .arg("check")
        .arg("nonexistent.aba")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing argument"));
}

#[test]
fn test_unknown_command_error() {
    cmd()
        .arg("convert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command 'convert'"));
}
