//! Line classifier and batch state machine.
//!
//! Each input line is classified by its record type marker, decoded, and fed
//! through a two-state machine: outside a batch, a descriptive record opens
//! one; inside a batch, detail records are appended until a file total record
//! whose totals and count match closes it.
//!
//! | State   | Record      | Result                               |
//! |---------|-------------|--------------------------------------|
//! | outside | descriptive | open batch                           |
//! | inside  | descriptive | [`ParseError::UnfinishedBatch`]      |
//! | inside  | detail      | append                               |
//! | outside | detail      | [`ParseError::TransactionOutsideBatch`] |
//! | inside  | file total  | close batch, or [`ParseError::SummaryMismatch`] |
//! | outside | file total  | [`ParseError::SummaryWithoutBatch`]  |
//!
//! Field values are not validated here; only the file total reconciliation
//! is checked.

use crate::batch::{Batch, Summary, SUMMARY_RECORD_TYPE};
use crate::error::{ParseError, Result};
use crate::headers::{self, Headers};
use crate::transaction::{self, Transaction};
use log::{debug, warn};
use std::io::BufRead;

/// Record type of an input line, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Headers,
    Transaction,
    Summary,
}

impl RecordKind {
    pub fn classify(line: &str) -> Option<Self> {
        match line.chars().next()? {
            headers::RECORD_TYPE => Some(RecordKind::Headers),
            transaction::RECORD_TYPE => Some(RecordKind::Transaction),
            SUMMARY_RECORD_TYPE => Some(RecordKind::Summary),
            _ => None,
        }
    }
}

/// A decoded input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Headers(Headers),
    Transaction(Transaction),
    Summary(Summary),
}

/// Strips CR/LF characters from `line`, classifies it and decodes it.
pub fn parse_line(line: &str, line_no: usize) -> std::result::Result<Record, ParseError> {
    let line = line.replace(['\r', '\n'], "");
    match RecordKind::classify(&line) {
        Some(RecordKind::Headers) => Headers::decode(&line, line_no).map(Record::Headers),
        Some(RecordKind::Transaction) => Transaction::decode(&line, line_no).map(Record::Transaction),
        Some(RecordKind::Summary) => Summary::decode(&line, line_no).map(Record::Summary),
        None => Err(ParseError::Unrecognized { line: line_no }),
    }
}

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Fail when input ends inside an open batch instead of dropping it.
    pub strict: bool,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    OutsideBatch,
    InBatch { batch: Batch, opened_at: usize },
}

/// Incremental ABA parser.
///
/// Feed lines one at a time with [`Parser::feed_line`] to receive batches as
/// soon as they close, or use [`Parser::parse_str`] / [`Parser::parse_reader`]
/// to consume a whole input.
#[derive(Debug, Default)]
pub struct Parser {
    config: ParserConfig,
    state: State,
    line_no: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Parser {
            config,
            ..Self::default()
        }
    }

    /// Returns `true` while a batch is open.
    pub fn in_batch(&self) -> bool {
        matches!(self.state, State::InBatch { .. })
    }

    /// Processes one input line.
    ///
    /// Returns the batch closed by this line, if any. Blank lines are
    /// skipped without affecting state.
    pub fn feed_line(&mut self, line: &str) -> std::result::Result<Option<Batch>, ParseError> {
        self.line_no += 1;
        if line.trim().is_empty() {
            return Ok(None);
        }

        let record = parse_line(line, self.line_no)?;
        self.apply(record)
    }

    fn apply(&mut self, record: Record) -> std::result::Result<Option<Batch>, ParseError> {
        let line = self.line_no;

        match record {
            Record::Headers(headers) => {
                if self.in_batch() {
                    return Err(ParseError::UnfinishedBatch { line });
                }
                debug!("Line {}: Opening batch '{}'", line, headers.description);
                self.state = State::InBatch {
                    batch: Batch::new(headers),
                    opened_at: line,
                };
                Ok(None)
            }
            Record::Transaction(tx) => match &mut self.state {
                State::InBatch { batch, .. } => {
                    let added = batch.add_transaction(tx);
                    debug!(
                        "Line {}: Added transaction code {} amount {}",
                        line, added.transaction_code, added.amount
                    );
                    Ok(None)
                }
                State::OutsideBatch => Err(ParseError::TransactionOutsideBatch { line }),
            },
            Record::Summary(summary) => match std::mem::take(&mut self.state) {
                State::InBatch { batch, opened_at } => {
                    if !summary.matches(&batch) {
                        self.state = State::InBatch { batch, opened_at };
                        return Err(ParseError::SummaryMismatch { line });
                    }
                    debug!(
                        "Line {}: Closed batch '{}' with {} transactions",
                        line,
                        batch.headers.description,
                        batch.count()
                    );
                    Ok(Some(batch))
                }
                State::OutsideBatch => Err(ParseError::SummaryWithoutBatch { line }),
            },
        }
    }

    /// Ends the input.
    ///
    /// An open batch is an error in strict mode; otherwise it is dropped
    /// with a warning.
    pub fn finish(self) -> std::result::Result<(), ParseError> {
        if let State::InBatch { opened_at, .. } = self.state {
            if self.config.strict {
                return Err(ParseError::UnterminatedBatch { line: opened_at });
            }
            warn!(
                "Input ended inside the batch opened at line {}, dropping it",
                opened_at
            );
        }
        Ok(())
    }

    /// Parses a block of text, split on line breaks.
    pub fn parse_str(mut self, text: &str) -> std::result::Result<Vec<Batch>, ParseError> {
        let mut batches = Vec::new();
        for line in text.split('\n') {
            batches.extend(self.feed_line(line)?);
        }
        self.finish()?;
        Ok(batches)
    }

    /// Parses lines pulled from `reader` until it is exhausted.
    pub fn parse_reader<R: BufRead>(mut self, reader: R) -> Result<Vec<Batch>> {
        let mut batches = Vec::new();
        for line in reader.lines() {
            batches.extend(self.feed_line(&line?)?);
        }
        self.finish()?;
        Ok(batches)
    }
}

/// Parses ABA text with the default (lenient) configuration.
pub fn parse_str(text: &str) -> std::result::Result<Vec<Batch>, ParseError> {
    Parser::new().parse_str(text)
}

/// Parses ABA lines from a reader with the default (lenient) configuration.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Batch>> {
    Parser::new().parse_reader(reader)
}
