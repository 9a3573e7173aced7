//! # ABA Codec
//!
//! Builds and parses ABA direct-entry files: the fixed-width, 120 column
//! format Australian banks use to exchange batched credit and debit
//! instructions.
//!
//! ## Design Principles
//!
//! - **Exact layout**: every record is rendered column for column and
//!   terminated by CR/LF
//! - **Strict invariants**: batch credit/debit totals always equal the sum
//!   of the transactions they hold
//! - **Reconciliation**: parsed batches are only emitted once their file
//!   total record matches the accumulated totals and count
//! - **Integer amounts**: all amounts are whole cents
//!
//! ## Example
//!
//! ```
//! use aba_codec::{Batch, Headers, Transaction};
//!
//! let mut batch = Batch::new(Headers {
//!     financial_institution: "WPC".to_string(),
//!     user_name: "John Doe".to_string(),
//!     user_id: "466364".to_string(),
//!     description: "Payroll".to_string(),
//!     process_at: "210915".to_string(),
//!     ..Headers::default()
//! });
//! batch.add_transaction(Transaction {
//!     bsb: "342-342".to_string(),
//!     account_number: "3244654".to_string(),
//!     transaction_code: 53,
//!     amount: 10000,
//!     account_name: "John Doe".to_string(),
//!     lodgement_reference: "R435564".to_string(),
//!     trace_bsb: "453-543".to_string(),
//!     trace_account_number: "45656733".to_string(),
//!     name_of_remitter: "Remitter".to_string(),
//!     ..Transaction::default()
//! });
//!
//! let text = batch.render().unwrap();
//! let parsed = aba_codec::parse_str(&text).unwrap();
//! assert_eq!(parsed[0].render().unwrap(), text);
//! ```

pub mod amount;
pub mod batch;
pub mod error;
pub mod field;
pub mod headers;
pub mod parser;
pub mod report;
pub mod transaction;
pub mod validation;

pub use amount::Dollars;
pub use batch::{Batch, BatchErrors, Summary};
pub use error::{AbaError, ParseError, Result};
pub use headers::Headers;
pub use parser::{parse_reader, parse_str, Parser, ParserConfig, Record, RecordKind};
pub use transaction::{Transaction, TransactionKind, TransactionRecord};
pub use validation::{FieldError, ValidationError};
