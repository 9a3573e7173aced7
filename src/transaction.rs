//! Detail record (record type `1`): one payment instruction.

use crate::error::ParseError;
use crate::field::{Field, RECORD_WIDTH};
use crate::validation::{self, FieldError, Rule, ValidationError};
use serde::Deserialize;

/// Record type marker of the detail record.
pub const RECORD_TYPE: char = '1';

/// Transaction codes that credit the target account.
///
/// 50 general credit, 51 Australian Government security interest,
/// 52 family allowance, 53 pay, 54 pension, 55 allotment, 56 dividend,
/// 57 debenture/note interest.
pub const CREDIT_CODES: &[u8] = &[50, 51, 52, 53, 54, 55, 56, 57];

/// Transaction codes that debit the target account (externally initiated debit).
pub const DEBIT_CODES: &[u8] = &[13];

/// Allowed withholding tax indicators.
pub const INDICATORS: &[char] = &[' ', 'N', 'T', 'W', 'X', 'Y'];

const BSB: Field = Field::text("bsb", 1, 7);
const ACCOUNT_NUMBER: Field = Field::right_blank("account_number", 8, 9);
const INDICATOR: Field = Field::text("indicator", 17, 1);
const TRANSACTION_CODE: Field = Field::numeric("transaction_code", 18, 2);
const AMOUNT: Field = Field::numeric("amount", 20, 10);
const ACCOUNT_NAME: Field = Field::text("account_name", 30, 32);
const LODGEMENT_REFERENCE: Field = Field::text("lodgement_reference", 62, 18);
const TRACE_BSB: Field = Field::text("trace_bsb", 80, 7);
const TRACE_ACCOUNT_NUMBER: Field = Field::right_blank("trace_account_number", 87, 9);
const NAME_OF_REMITTER: Field = Field::text("name_of_remitter", 96, 16);
const WITHHOLDING_AMOUNT: Field = Field::numeric("withholding_amount", 112, 8);

const RULES: &[Rule<Transaction>] = &[
    Rule {
        field: "bsb",
        message: "must be a valid BSB format",
        check: |t| validation::is_bsb(&t.bsb),
    },
    Rule {
        field: "account_number",
        message: "must be up to 9 digits",
        check: |t| is_account_number(&t.account_number),
    },
    Rule {
        field: "indicator",
        message: "must be one of ' ', 'N', 'T', 'W', 'X', 'Y'",
        check: |t| INDICATORS.contains(&t.indicator),
    },
    Rule {
        field: "transaction_code",
        message: "must be a known credit or debit code",
        check: |t| t.kind().is_some(),
    },
    Rule {
        field: "amount",
        message: "must fit in 10 digits",
        check: |t| validation::fits_digits(t.amount, 10),
    },
    Rule {
        field: "account_name",
        message: "must be present",
        check: |t| validation::is_present(&t.account_name),
    },
    Rule {
        field: "account_name",
        message: "must be 32 characters or less",
        check: |t| validation::fits(&t.account_name, ACCOUNT_NAME.width),
    },
    Rule {
        field: "account_name",
        message: "must contain only BECS characters",
        check: |t| validation::is_becs(&t.account_name),
    },
    Rule {
        field: "lodgement_reference",
        message: "must be present",
        check: |t| validation::is_present(&t.lodgement_reference),
    },
    Rule {
        field: "lodgement_reference",
        message: "must be 18 characters or less",
        check: |t| validation::fits(&t.lodgement_reference, LODGEMENT_REFERENCE.width),
    },
    Rule {
        field: "lodgement_reference",
        message: "must contain only BECS characters",
        check: |t| validation::is_becs(&t.lodgement_reference),
    },
    Rule {
        field: "trace_bsb",
        message: "must be a valid BSB format",
        check: |t| validation::is_bsb(&t.trace_bsb),
    },
    Rule {
        field: "trace_account_number",
        message: "must be up to 9 digits",
        check: |t| is_account_number(&t.trace_account_number),
    },
    Rule {
        field: "name_of_remitter",
        message: "must be present",
        check: |t| validation::is_present(&t.name_of_remitter),
    },
    Rule {
        field: "name_of_remitter",
        message: "must be 16 characters or less",
        check: |t| validation::fits(&t.name_of_remitter, NAME_OF_REMITTER.width),
    },
    Rule {
        field: "name_of_remitter",
        message: "must contain only BECS characters",
        check: |t| validation::is_becs(&t.name_of_remitter),
    },
    Rule {
        field: "withholding_amount",
        message: "must fit in 8 digits",
        check: |t| validation::fits_digits(t.withholding_amount, 8),
    },
];

fn is_account_number(value: &str) -> bool {
    validation::is_digits(value) && validation::fits(value, ACCOUNT_NUMBER.width)
}

fn write_number(
    out: &mut String,
    field: Field,
    value: u64,
) -> std::result::Result<(), ValidationError> {
    field.write_number(out, value).map_err(|e| ValidationError {
        record: "Transaction",
        errors: vec![e],
    })
}

/// Direction of a payment instruction, derived from its transaction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    /// Classifies a transaction code; `None` for codes outside both tables.
    pub fn from_code(code: u8) -> Option<Self> {
        if CREDIT_CODES.contains(&code) {
            Some(TransactionKind::Credit)
        } else if DEBIT_CODES.contains(&code) {
            Some(TransactionKind::Debit)
        } else {
            None
        }
    }
}

/// A single payment instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// BSB of the account to credit or debit, `XXX-XXX`.
    pub bsb: String,
    pub account_number: String,
    /// Withholding tax indicator, blank by default.
    pub indicator: char,
    pub transaction_code: u8,
    /// Amount in cents.
    pub amount: u64,
    pub account_name: String,
    pub lodgement_reference: String,
    /// BSB of the remitter's account, for returns.
    pub trace_bsb: String,
    pub trace_account_number: String,
    pub name_of_remitter: String,
    /// Tax withheld, in cents.
    pub withholding_amount: u64,
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction {
            bsb: String::new(),
            account_number: String::new(),
            indicator: ' ',
            transaction_code: 0,
            amount: 0,
            account_name: String::new(),
            lodgement_reference: String::new(),
            trace_bsb: String::new(),
            trace_account_number: String::new(),
            name_of_remitter: String::new(),
            withholding_amount: 0,
        }
    }
}

impl Transaction {
    pub fn kind(&self) -> Option<TransactionKind> {
        TransactionKind::from_code(self.transaction_code)
    }

    pub fn is_credit(&self) -> bool {
        self.kind() == Some(TransactionKind::Credit)
    }

    pub fn is_debit(&self) -> bool {
        self.kind() == Some(TransactionKind::Debit)
    }

    /// Fails with every violated rule if any field is invalid.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validation::validate("Transaction", self, RULES)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn errors(&self) -> Vec<FieldError> {
        validation::check(self, RULES)
    }

    /// Renders the 120 column detail record (without terminator).
    pub fn render(&self) -> std::result::Result<String, ValidationError> {
        self.validate()?;

        let mut out = String::with_capacity(RECORD_WIDTH);
        out.push(RECORD_TYPE);
        BSB.write_text(&mut out, &self.bsb);
        ACCOUNT_NUMBER.write_text(&mut out, &self.account_number);
        INDICATOR.write_text(&mut out, &self.indicator.to_string());
        write_number(&mut out, TRANSACTION_CODE, self.transaction_code.into())?;
        write_number(&mut out, AMOUNT, self.amount)?;
        ACCOUNT_NAME.write_text(&mut out, &self.account_name);
        LODGEMENT_REFERENCE.write_text(&mut out, &self.lodgement_reference);
        TRACE_BSB.write_text(&mut out, &self.trace_bsb);
        TRACE_ACCOUNT_NUMBER.write_text(&mut out, &self.trace_account_number);
        NAME_OF_REMITTER.write_text(&mut out, &self.name_of_remitter);
        write_number(&mut out, WITHHOLDING_AMOUNT, self.withholding_amount)?;

        Ok(out)
    }

    /// Decodes a detail record line. Field values are not validated.
    pub fn decode(line: &str, line_no: usize) -> std::result::Result<Self, ParseError> {
        let code = TRANSACTION_CODE.extract_number(line, line_no)?;
        let transaction_code = u8::try_from(code).map_err(|_| ParseError::InvalidField {
            line: line_no,
            field: TRANSACTION_CODE.name,
        })?;

        Ok(Transaction {
            bsb: BSB.extract_trimmed(line),
            account_number: ACCOUNT_NUMBER.extract_trimmed(line),
            indicator: INDICATOR.extract(line).chars().next().unwrap_or(' '),
            transaction_code,
            amount: AMOUNT.extract_number(line, line_no)?,
            account_name: ACCOUNT_NAME.extract_text(line),
            lodgement_reference: LODGEMENT_REFERENCE.extract_text(line),
            trace_bsb: TRACE_BSB.extract_trimmed(line),
            trace_account_number: TRACE_ACCOUNT_NUMBER.extract_trimmed(line),
            name_of_remitter: NAME_OF_REMITTER.extract_text(line),
            withholding_amount: WITHHOLDING_AMOUNT.extract_number(line, line_no)?,
        })
    }
}

/// Field mapping for a transaction as read from CSV or other serde input.
///
/// Text values are trimmed on conversion; a missing indicator is blank and a
/// missing withholding amount is zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    pub bsb: String,
    pub account_number: String,
    pub indicator: Option<String>,
    pub transaction_code: u8,
    pub amount: u64,
    pub account_name: String,
    pub lodgement_reference: String,
    pub trace_bsb: String,
    pub trace_account_number: String,
    pub name_of_remitter: String,
    pub withholding_amount: Option<u64>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        Transaction {
            bsb: record.bsb.trim().to_string(),
            account_number: record.account_number.trim().to_string(),
            indicator: record
                .indicator
                .as_deref()
                .and_then(|i| i.trim().chars().next())
                .unwrap_or(' '),
            transaction_code: record.transaction_code,
            amount: record.amount,
            account_name: record.account_name.trim().to_string(),
            lodgement_reference: record.lodgement_reference.trim().to_string(),
            trace_bsb: record.trace_bsb.trim().to_string(),
            trace_account_number: record.trace_account_number.trim().to_string(),
            name_of_remitter: record.name_of_remitter.trim().to_string(),
            withholding_amount: record.withholding_amount.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "1342-342  3244654 500000010000John Doe                        R435564           453-543 45656733Remitter        00000010";

    fn transaction() -> Transaction {
        Transaction {
            bsb: "342-342".to_string(),
            account_number: "3244654".to_string(),
            indicator: ' ',
            transaction_code: 50,
            amount: 10000,
            account_name: "John Doe".to_string(),
            lodgement_reference: "R435564".to_string(),
            trace_bsb: "453-543".to_string(),
            trace_account_number: "45656733".to_string(),
            name_of_remitter: "Remitter".to_string(),
            withholding_amount: 10,
        }
    }

    #[test]
    fn test_render() {
        assert_eq!(transaction().render().unwrap(), LINE);
    }

    #[test]
    fn test_render_is_120_columns() {
        let mut tx = transaction();
        tx.amount = 9_999_999_999;
        assert_eq!(tx.render().unwrap().len(), 120);
    }

    #[test]
    fn test_decode() {
        assert_eq!(Transaction::decode(LINE, 2).unwrap(), transaction());
    }

    #[test]
    fn test_decode_keeps_leading_spaces_in_text() {
        let tx = Transaction {
            account_name: " John Doe".to_string(),
            lodgement_reference: "  R435564".to_string(),
            name_of_remitter: " Remitter".to_string(),
            ..transaction()
        };
        assert!(tx.is_valid());

        let line = tx.render().unwrap();
        let decoded = Transaction::decode(&line, 2).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.render().unwrap(), line);
    }

    #[test]
    fn test_non_ascii_digit_bsb_is_invalid() {
        let tx = Transaction {
            bsb: "\u{0661}\u{0662}\u{0663}-\u{0664}\u{0665}\u{0666}".to_string(),
            trace_bsb: "\u{FF14}53-543".to_string(),
            ..transaction()
        };
        let err = tx.render().unwrap_err();
        assert!(err.has_field("bsb"));
        assert!(err.has_field("trace_bsb"));
    }

    #[test]
    fn test_decode_rejects_non_numeric_amount() {
        let line = LINE.replace("0000010000", "00000X0000");
        assert_eq!(
            Transaction::decode(&line, 4),
            Err(ParseError::InvalidField {
                line: 4,
                field: "amount"
            })
        );
    }

    #[test]
    fn test_classification() {
        for code in CREDIT_CODES {
            let tx = Transaction {
                transaction_code: *code,
                ..transaction()
            };
            assert!(tx.is_credit());
            assert!(!tx.is_debit());
        }

        let debit = Transaction {
            transaction_code: 13,
            ..transaction()
        };
        assert!(debit.is_debit());
        assert!(!debit.is_credit());
    }

    #[test]
    fn test_unknown_code_is_neither_and_invalid() {
        let tx = Transaction {
            transaction_code: 99,
            ..transaction()
        };
        assert!(!tx.is_credit());
        assert!(!tx.is_debit());
        assert!(!tx.is_valid());
        assert!(tx.validate().unwrap_err().has_field("transaction_code"));
    }

    #[test]
    fn test_render_fails_on_invalid_data() {
        let tx = Transaction {
            bsb: "342342".to_string(),
            account_number: "1234567890".to_string(),
            indicator: 'Z',
            ..transaction()
        };
        let err = tx.render().unwrap_err();
        assert!(err.has_field("bsb"));
        assert!(err.has_field("account_number"));
        assert!(err.has_field("indicator"));
    }

    #[test]
    fn test_default_transaction_lists_missing_fields() {
        let errors = Transaction::default().errors();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        for field in [
            "bsb",
            "account_number",
            "transaction_code",
            "account_name",
            "lodgement_reference",
            "trace_bsb",
            "trace_account_number",
            "name_of_remitter",
        ] {
            assert!(fields.contains(&field), "missing error for {field}");
        }
        assert!(!fields.contains(&"indicator"));
        assert!(!fields.contains(&"amount"));
    }

    #[test]
    fn test_amount_wider_than_slot_is_invalid() {
        let tx = Transaction {
            amount: 10_000_000_000,
            ..transaction()
        };
        assert!(tx.validate().unwrap_err().has_field("amount"));
    }

    #[test]
    fn test_from_record_trims_and_defaults() {
        let record = TransactionRecord {
            bsb: " 342-342 ".to_string(),
            account_number: "3244654".to_string(),
            indicator: None,
            transaction_code: 50,
            amount: 10000,
            account_name: " John Doe".to_string(),
            lodgement_reference: "R435564".to_string(),
            trace_bsb: "453-543".to_string(),
            trace_account_number: "45656733".to_string(),
            name_of_remitter: "Remitter ".to_string(),
            withholding_amount: Some(10),
        };

        assert_eq!(Transaction::from(record), transaction());
    }
}
