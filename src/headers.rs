//! Descriptive record (record type `0`) opening every batch.

use crate::error::ParseError;
use crate::field::{fill_record, Field};
use crate::validation::{self, FieldError, Rule, ValidationError};
use serde::Deserialize;

/// Record type marker of the descriptive record.
pub const RECORD_TYPE: char = '0';

/// Reel sequence number; always `01` for single-reel files.
pub const REEL_SEQUENCE: &str = "01";

const BSB: Field = Field::text("bsb", 1, 7);
const RESERVED_1: Field = Field::text("reserved", 8, 10);
const REEL: Field = Field::numeric("reel_sequence", 18, 2);
const FINANCIAL_INSTITUTION: Field = Field::text("financial_institution", 20, 3);
const RESERVED_2: Field = Field::text("reserved", 23, 7);
const USER_NAME: Field = Field::text("user_name", 30, 26);
const USER_ID: Field = Field::numeric("user_id", 56, 6);
const DESCRIPTION: Field = Field::text("description", 62, 12);
const PROCESS_AT: Field = Field::text("process_at", 74, 6);

const RULES: &[Rule<Headers>] = &[
    Rule {
        field: "bsb",
        message: "must be a valid BSB format",
        check: |h| h.bsb.as_deref().map_or(true, |b| b.is_empty() || validation::is_bsb(b)),
    },
    Rule {
        field: "financial_institution",
        message: "must be present",
        check: |h| validation::is_present(&h.financial_institution),
    },
    Rule {
        field: "financial_institution",
        message: "must be 3 characters or less",
        check: |h| validation::fits(&h.financial_institution, FINANCIAL_INSTITUTION.width),
    },
    Rule {
        field: "user_name",
        message: "must be present",
        check: |h| validation::is_present(&h.user_name),
    },
    Rule {
        field: "user_name",
        message: "must be 26 characters or less",
        check: |h| validation::fits(&h.user_name, USER_NAME.width),
    },
    Rule {
        field: "user_name",
        message: "must contain only BECS characters",
        check: |h| validation::is_becs(&h.user_name),
    },
    Rule {
        field: "user_id",
        message: "must be up to 6 digits",
        check: |h| validation::is_digits(&h.user_id) && validation::fits(&h.user_id, USER_ID.width),
    },
    Rule {
        field: "description",
        message: "must be present",
        check: |h| validation::is_present(&h.description),
    },
    Rule {
        field: "description",
        message: "must be 12 characters or less",
        check: |h| validation::fits(&h.description, DESCRIPTION.width),
    },
    Rule {
        field: "description",
        message: "must contain only BECS characters",
        check: |h| validation::is_becs(&h.description),
    },
    Rule {
        field: "process_at",
        message: "must be a 6 digit date (DDMMYY)",
        check: |h| h.process_at.len() == 6 && validation::is_digits(&h.process_at),
    },
];

/// Batch-level identity carried by the descriptive record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Headers {
    /// Optional BSB of the file owner; blank when absent.
    pub bsb: Option<String>,
    /// Three letter abbreviation of the user's bank, e.g. `WBC`.
    pub financial_institution: String,
    pub user_name: String,
    /// APCA user identification number.
    pub user_id: String,
    pub description: String,
    /// Processing date as `DDMMYY`.
    pub process_at: String,
}

impl Headers {
    /// Fails with every violated rule if any field is invalid.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validation::validate("Headers", self, RULES)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn errors(&self) -> Vec<FieldError> {
        validation::check(self, RULES)
    }

    /// Renders the 120 column descriptive record (without terminator).
    pub fn render(&self) -> std::result::Result<String, ValidationError> {
        self.validate()?;

        let mut out = String::with_capacity(crate::field::RECORD_WIDTH);
        out.push(RECORD_TYPE);
        match self.bsb.as_deref().filter(|b| !b.is_empty()) {
            Some(bsb) => BSB.write_text(&mut out, bsb),
            None => BSB.write_blank(&mut out),
        }
        RESERVED_1.write_blank(&mut out);
        REEL.write_text(&mut out, REEL_SEQUENCE);
        FINANCIAL_INSTITUTION.write_text(&mut out, &self.financial_institution);
        RESERVED_2.write_blank(&mut out);
        USER_NAME.write_text(&mut out, &self.user_name);
        USER_ID.write_text(&mut out, &self.user_id);
        DESCRIPTION.write_text(&mut out, &self.description);
        PROCESS_AT.write_text(&mut out, &self.process_at);
        fill_record(&mut out);

        Ok(out)
    }

    /// Decodes a descriptive record line. Field values are not validated.
    pub fn decode(line: &str, _line_no: usize) -> std::result::Result<Self, ParseError> {
        let bsb = BSB.extract_trimmed(line);
        Ok(Headers {
            bsb: (!bsb.is_empty()).then_some(bsb),
            financial_institution: FINANCIAL_INSTITUTION.extract_text(line),
            user_name: USER_NAME.extract_text(line),
            user_id: USER_ID.extract_trimmed(line),
            description: DESCRIPTION.extract_text(line),
            process_at: PROCESS_AT.extract_trimmed(line),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Headers {
        Headers {
            bsb: None,
            financial_institution: "ABC".to_string(),
            user_name: "John Doe".to_string(),
            user_id: "987654".to_string(),
            description: "Description".to_string(),
            process_at: "190615".to_string(),
        }
    }

    #[test]
    fn test_render_without_bsb() {
        assert_eq!(
            headers().render().unwrap(),
            "0                 01ABC       John Doe                  987654Description 190615                                        "
        );
    }

    #[test]
    fn test_render_with_bsb() {
        let mut h = headers();
        h.bsb = Some("123-456".to_string());
        assert_eq!(
            h.render().unwrap(),
            "0123-456          01ABC       John Doe                  987654Description 190615                                        "
        );
    }

    #[test]
    fn test_empty_bsb_renders_as_blank() {
        let mut h = headers();
        h.bsb = Some(String::new());
        assert!(h.is_valid());
        assert_eq!(h.render().unwrap(), headers().render().unwrap());
    }

    #[test]
    fn test_render_is_120_columns() {
        assert_eq!(headers().render().unwrap().len(), 120);
    }

    #[test]
    fn test_render_validates_first() {
        let mut h = headers();
        h.bsb = Some("123456".to_string());
        h.process_at = "19-06-15".to_string();

        let err = h.render().unwrap_err();
        assert!(err.has_field("bsb"));
        assert!(err.has_field("process_at"));
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_errors_enumerates_violations() {
        let h = Headers::default();
        let fields: Vec<_> = h.errors().iter().map(|e| e.field).collect();
        assert!(fields.contains(&"financial_institution"));
        assert!(fields.contains(&"user_name"));
        assert!(fields.contains(&"user_id"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"process_at"));
        assert!(!fields.contains(&"bsb"));
        assert!(!h.is_valid());
    }

    #[test]
    fn test_overlong_fields_are_invalid() {
        let mut h = headers();
        h.user_name = "A".repeat(27);
        h.user_id = "1234567".to_string();
        h.description = "Much too long description".to_string();

        let err = h.validate().unwrap_err();
        assert!(err.has_field("user_name"));
        assert!(err.has_field("user_id"));
        assert!(err.has_field("description"));
    }

    #[test]
    fn test_decode() {
        let line = "0123-345          01WPC       John Doe                  466364Payroll     210915                                        ";
        let h = Headers::decode(line, 1).unwrap();

        assert_eq!(h.bsb.as_deref(), Some("123-345"));
        assert_eq!(h.financial_institution, "WPC");
        assert_eq!(h.user_name, "John Doe");
        assert_eq!(h.user_id, "466364");
        assert_eq!(h.description, "Payroll");
        assert_eq!(h.process_at, "210915");
        assert_eq!(h.render().unwrap(), line);
    }

    #[test]
    fn test_decode_blank_bsb() {
        let line = headers().render().unwrap();
        assert_eq!(Headers::decode(&line, 1).unwrap().bsb, None);
    }

    #[test]
    fn test_financial_institution_is_length_checked_only() {
        for fi in ["Wbc", "WB", "C1"] {
            let h = Headers {
                financial_institution: fi.to_string(),
                ..headers()
            };
            assert!(h.is_valid(), "{fi} should be accepted");
        }

        let h = Headers {
            financial_institution: "WBCX".to_string(),
            ..headers()
        };
        assert!(h.validate().unwrap_err().has_field("financial_institution"));
    }

    #[test]
    fn test_decode_keeps_leading_spaces_in_text() {
        let h = Headers {
            financial_institution: " WB".to_string(),
            user_name: "  John Doe".to_string(),
            description: " Payroll".to_string(),
            ..headers()
        };
        let line = h.render().unwrap();
        let decoded = Headers::decode(&line, 1).unwrap();

        assert_eq!(decoded, h);
        assert_eq!(decoded.render().unwrap(), line);
    }
}
