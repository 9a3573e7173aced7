//! Error types for encoding and parsing ABA files.

use crate::validation::ValidationError;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, AbaError>;

/// Errors raised while turning ABA text back into batches.
///
/// Every variant carries the 1-based number of the input line that caused it.
/// A parse error aborts the whole parse call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with a known record type marker.
    #[error("Could not parse given input at line {line}")]
    Unrecognized { line: usize },

    /// A descriptive record appeared while a batch was still open.
    #[error("Previous batch wasn't finished when a new batch appeared (line {line})")]
    UnfinishedBatch { line: usize },

    /// A detail record appeared with no open batch.
    #[error("Transaction not within a batch (line {line})")]
    TransactionOutsideBatch { line: usize },

    /// A file total record appeared with no open batch.
    #[error("Batch summary without a batch appeared (line {line})")]
    SummaryWithoutBatch { line: usize },

    /// Totals or count on the file total record disagree with the batch.
    #[error("Summary line doesn't match calculated summary of current batch (line {line})")]
    SummaryMismatch { line: usize },

    /// A numeric column holds something other than digits.
    #[error("Invalid value for {field} at line {line}")]
    InvalidField { line: usize, field: &'static str },

    /// Input ended while a batch was open (strict mode only).
    #[error("Input ended before the batch opened at line {line} was finished")]
    UnterminatedBatch { line: usize },
}

/// Errors that can occur while building, rendering or parsing ABA data.
#[derive(Error, Debug)]
pub enum AbaError {
    /// A record failed its field rules
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input text could not be turned into batches
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Rendering was attempted on a batch without detail records
    #[error("Batch has no transactions")]
    EmptyBatch,

    /// A computed value is wider than the slot it is written to
    #[error("Value for {field} does not fit in {width} columns")]
    FieldOverflow { field: &'static str, width: usize },

    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV input or output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// CSV header input held no rows
    #[error("Headers file contains no record")]
    MissingHeaders,

    /// Missing command line arguments
    #[error("Missing argument. Usage: aba-codec check [--strict] <file.aba> | aba-codec render <headers.csv> <transactions.csv>")]
    MissingArgument,

    /// Unknown subcommand
    #[error("Unknown command '{0}'. Expected 'check' or 'render'")]
    UnknownCommand(String),
}
