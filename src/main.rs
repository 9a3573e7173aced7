//! ABA Codec CLI
//!
//! Checks ABA files and renders new ones from CSV input.
//!
//! # Usage
//!
//! ```bash
//! aba-codec check [--strict] payments.aba > batches.csv
//! aba-codec render headers.csv transactions.csv > payments.aba
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use aba_codec::{report, AbaError, Parser, ParserConfig, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().ok_or(AbaError::MissingArgument)?;

    match command.as_str() {
        "check" => check(&args[1..]),
        "render" => render(&args[1..]),
        other => Err(AbaError::UnknownCommand(other.to_string())),
    }
}

fn check(args: &[String]) -> Result<()> {
    let strict = args.iter().any(|a| a == "--strict");
    let input_path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .ok_or(AbaError::MissingArgument)?;

    let reader = BufReader::new(File::open(input_path)?);
    let batches = Parser::with_config(ParserConfig { strict }).parse_reader(reader)?;

    let stdout = io::stdout();
    report::write_report(stdout.lock(), &batches)
}

fn render(args: &[String]) -> Result<()> {
    let [headers_path, transactions_path, ..] = args else {
        return Err(AbaError::MissingArgument);
    };

    let batch = report::build_batch(File::open(headers_path)?, File::open(transactions_path)?)?;
    let output = batch.render()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    handle.flush()?;
    Ok(())
}
