//! CSV input and output around the codec.
//!
//! Batches can be built from CSV field mappings (one headers row plus any
//! number of transaction rows) and parsed batches can be summarised as CSV,
//! one row per batch.

use crate::amount::Dollars;
use crate::batch::Batch;
use crate::error::{AbaError, Result};
use crate::headers::Headers;
use crate::transaction::TransactionRecord;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Serialize;
use std::io::{Read, Write};

/// One output row describing a parsed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 1-based position of the batch within the file.
    pub batch: usize,
    pub bsb: String,
    pub financial_institution: String,
    pub user_name: String,
    pub description: String,
    pub process_at: String,
    pub count: usize,
    pub credit_total: Dollars,
    pub debit_total: Dollars,
    pub net_total: Dollars,
}

impl BatchReport {
    pub fn new(position: usize, batch: &Batch) -> Self {
        let headers = &batch.headers;
        BatchReport {
            batch: position,
            bsb: headers.bsb.clone().unwrap_or_default(),
            financial_institution: headers.financial_institution.clone(),
            user_name: headers.user_name.clone(),
            description: headers.description.clone(),
            process_at: headers.process_at.clone(),
            count: batch.count(),
            credit_total: Dollars::from_cents(batch.credit_total_amount()),
            debit_total: Dollars::from_cents(batch.debit_total_amount()),
            net_total: Dollars::from_signed_cents(batch.net_total_amount()),
        }
    }
}

/// Writes one CSV row per batch, in input order.
pub fn write_report<W: Write>(writer: W, batches: &[Batch]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if batches.is_empty() {
        // serialize() only emits the header row alongside the first record
        csv_writer.write_record([
            "batch",
            "bsb",
            "financial_institution",
            "user_name",
            "description",
            "process_at",
            "count",
            "credit_total",
            "debit_total",
            "net_total",
        ])?;
    }

    for (idx, batch) in batches.iter().enumerate() {
        csv_writer.serialize(BatchReport::new(idx + 1, batch))?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads the descriptive record fields from the first CSV row.
pub fn read_headers<R: Read>(reader: R) -> Result<Headers> {
    let mut csv_reader = csv_reader(reader);
    let mut rows = csv_reader.deserialize::<Headers>();
    let headers = rows.next().ok_or(AbaError::MissingHeaders)??;

    if rows.next().is_some() {
        warn!("Headers input has more than one row, using the first");
    }
    Ok(headers)
}

/// Builds a batch from a headers CSV and a transactions CSV.
///
/// Rows are appended in input order. Field values are not validated until
/// the batch is rendered.
pub fn build_batch<H: Read, T: Read>(headers: H, transactions: T) -> Result<Batch> {
    let mut batch = Batch::new(read_headers(headers)?);

    for (row_idx, result) in csv_reader(transactions)
        .deserialize::<TransactionRecord>()
        .enumerate()
    {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row
        let added = batch.add_transaction(result?);
        debug!(
            "Row {}: Added transaction code {} amount {}",
            row_num, added.transaction_code, added.amount
        );
    }

    Ok(batch)
}
