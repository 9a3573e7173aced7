//! Batch model and the file total record that closes it.
//!
//! A [`Batch`] owns one [`Headers`] and an append-only list of
//! [`Transaction`]s, and keeps its credit and debit totals up to date on
//! every append.
//!
//! # Invariants
//!
//! - `credit_total_amount` is the sum of amounts of credit transactions
//! - `debit_total_amount` is the sum of amounts of debit transactions
//! - Both hold after every call to [`Batch::add_transaction`]

use crate::error::{AbaError, ParseError, Result};
use crate::field::{fill_record, Field, LINE_TERMINATOR, RECORD_WIDTH};
use crate::headers::Headers;
use crate::transaction::{Transaction, TransactionKind};
use crate::validation::FieldError;
use log::debug;
use std::collections::BTreeMap;

/// Record type marker of the file total record.
pub const SUMMARY_RECORD_TYPE: char = '7';

/// BSB filler written on every file total record.
pub const SUMMARY_BSB: &str = "999-999";

const BSB: Field = Field::text("bsb", 1, 7);
const RESERVED_1: Field = Field::text("reserved", 8, 12);
const NET_TOTAL: Field = Field::numeric("net_total_amount", 20, 10);
const CREDIT_TOTAL: Field = Field::numeric("credit_total_amount", 30, 10);
const DEBIT_TOTAL: Field = Field::numeric("debit_total_amount", 40, 10);
const RESERVED_2: Field = Field::text("reserved", 50, 24);
const COUNT: Field = Field::numeric("count", 74, 6);

/// Totals carried by a file total record.
///
/// Amounts are absolute values, as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub bsb: String,
    pub net_total_amount: u64,
    pub credit_total_amount: u64,
    pub debit_total_amount: u64,
    pub count: u64,
}

impl Summary {
    /// Computes the summary of a batch's current contents.
    pub fn of(batch: &Batch) -> Self {
        Summary {
            bsb: SUMMARY_BSB.to_string(),
            net_total_amount: abs_u64(batch.net_total_amount()),
            credit_total_amount: batch.credit_total_amount(),
            debit_total_amount: batch.debit_total_amount(),
            count: batch.count() as u64,
        }
    }

    /// Returns `true` if totals and count agree exactly with `batch`.
    pub fn matches(&self, batch: &Batch) -> bool {
        self.net_total_amount == abs_u64(batch.net_total_amount())
            && self.credit_total_amount == batch.credit_total_amount()
            && self.debit_total_amount == batch.debit_total_amount()
            && self.count == batch.count() as u64
    }

    /// Renders the 120 column file total record (without terminator).
    pub fn render(&self) -> Result<String> {
        let mut out = String::with_capacity(RECORD_WIDTH);
        out.push(SUMMARY_RECORD_TYPE);
        BSB.write_text(&mut out, &self.bsb);
        RESERVED_1.write_blank(&mut out);
        write_total(&mut out, NET_TOTAL, self.net_total_amount)?;
        write_total(&mut out, CREDIT_TOTAL, self.credit_total_amount)?;
        write_total(&mut out, DEBIT_TOTAL, self.debit_total_amount)?;
        RESERVED_2.write_blank(&mut out);
        write_total(&mut out, COUNT, self.count)?;
        fill_record(&mut out);
        Ok(out)
    }

    /// Decodes a file total record line.
    pub fn decode(line: &str, line_no: usize) -> std::result::Result<Self, ParseError> {
        Ok(Summary {
            bsb: BSB.extract_trimmed(line),
            net_total_amount: NET_TOTAL.extract_number(line, line_no)?,
            credit_total_amount: CREDIT_TOTAL.extract_number(line, line_no)?,
            debit_total_amount: DEBIT_TOTAL.extract_number(line, line_no)?,
            count: COUNT.extract_number(line, line_no)?,
        })
    }
}

fn write_total(out: &mut String, field: Field, value: u64) -> Result<()> {
    field
        .write_number(out, value)
        .map_err(|_| AbaError::FieldOverflow {
            field: field.name,
            width: field.width,
        })
}

fn abs_u64(value: i128) -> u64 {
    u64::try_from(value.unsigned_abs()).unwrap_or(u64::MAX)
}

/// Field errors of a batch, grouped by record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchErrors {
    pub headers: Vec<FieldError>,
    /// Errors of invalid transactions, keyed by 1-based position in the batch.
    pub transactions: BTreeMap<usize, Vec<FieldError>>,
}

impl BatchErrors {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.transactions.is_empty()
    }
}

/// A descriptive record, its detail records and running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub headers: Headers,
    transactions: Vec<Transaction>,
    credit_total_amount: u64,
    debit_total_amount: u64,
}

impl Batch {
    /// Creates an empty batch with the given headers.
    pub fn new(headers: Headers) -> Self {
        Batch {
            headers,
            transactions: Vec::new(),
            credit_total_amount: 0,
            debit_total_amount: 0,
        }
    }

    /// Appends a transaction and updates the matching running total.
    ///
    /// Accepts a [`Transaction`] as-is or anything convertible into one,
    /// such as a [`TransactionRecord`](crate::TransactionRecord) field mapping.
    /// Transactions with an unknown code count towards neither total; they
    /// fail validation when rendered.
    pub fn add_transaction<T: Into<Transaction>>(&mut self, value: T) -> &Transaction {
        let transaction = value.into();
        match transaction.kind() {
            Some(TransactionKind::Credit) => {
                self.credit_total_amount = self.credit_total_amount.saturating_add(transaction.amount);
            }
            Some(TransactionKind::Debit) => {
                self.debit_total_amount = self.debit_total_amount.saturating_add(transaction.amount);
            }
            None => {}
        }
        self.transactions.push(transaction);
        &self.transactions[self.transactions.len() - 1]
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn credit_total_amount(&self) -> u64 {
        self.credit_total_amount
    }

    pub fn debit_total_amount(&self) -> u64 {
        self.debit_total_amount
    }

    /// Credits minus debits; negative when debits dominate.
    pub fn net_total_amount(&self) -> i128 {
        i128::from(self.credit_total_amount) - i128::from(self.debit_total_amount)
    }

    /// Number of transactions in the batch.
    pub fn count(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Returns `true` if every transaction passes its field rules.
    pub fn transactions_valid(&self) -> bool {
        self.transactions.iter().all(Transaction::is_valid)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn errors(&self) -> BatchErrors {
        let transactions = self
            .transactions
            .iter()
            .enumerate()
            .filter_map(|(idx, tx)| {
                let errors = tx.errors();
                (!errors.is_empty()).then_some((idx + 1, errors))
            })
            .collect();

        BatchErrors {
            headers: self.headers.errors(),
            transactions,
        }
    }

    /// Returns the file total record for the current contents.
    pub fn summary(&self) -> Summary {
        Summary::of(self)
    }

    /// Renders the descriptive record, every detail record in insertion order
    /// and the computed file total record, each terminated by CR/LF.
    pub fn render(&self) -> Result<String> {
        if self.is_empty() {
            return Err(AbaError::EmptyBatch);
        }

        let records = self.count() + 2;
        let mut out = String::with_capacity(records * (RECORD_WIDTH + LINE_TERMINATOR.len()));

        out.push_str(&self.headers.render()?);
        out.push_str(LINE_TERMINATOR);
        for transaction in &self.transactions {
            out.push_str(&transaction.render()?);
            out.push_str(LINE_TERMINATOR);
        }
        out.push_str(&self.summary().render()?);
        out.push_str(LINE_TERMINATOR);

        debug!(
            "Rendered batch '{}' with {} transactions",
            self.headers.description,
            self.count()
        );
        Ok(out)
    }
}

impl From<Headers> for Batch {
    fn from(headers: Headers) -> Self {
        Batch::new(headers)
    }
}
