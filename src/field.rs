//! Fixed-width field codec.
//!
//! Every ABA record is 120 columns wide and each value lives in a fixed
//! column range. A [`Field`] describes one such slot and knows how to write
//! a value into it and read a value back out of a decoded line.

use crate::error::ParseError;
use crate::validation::FieldError;

/// Width of every ABA record, excluding the line terminator.
pub const RECORD_WIDTH: usize = 120;

/// Terminator written after every record.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Which side of the slot a value is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Right,
}

/// Description of one fixed-width slot within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, used in error messages.
    pub name: &'static str,
    /// Zero-based start column.
    pub start: usize,
    /// Slot width in characters.
    pub width: usize,
    pub justify: Justify,
    pub fill: char,
}

impl Field {
    /// Left-justified text padded with spaces.
    pub const fn text(name: &'static str, start: usize, width: usize) -> Self {
        Field {
            name,
            start,
            width,
            justify: Justify::Left,
            fill: ' ',
        }
    }

    /// Right-justified integer padded with zeros.
    pub const fn numeric(name: &'static str, start: usize, width: usize) -> Self {
        Field {
            name,
            start,
            width,
            justify: Justify::Right,
            fill: '0',
        }
    }

    /// Right-justified value padded with spaces (account numbers).
    pub const fn right_blank(name: &'static str, start: usize, width: usize) -> Self {
        Field {
            name,
            start,
            width,
            justify: Justify::Right,
            fill: ' ',
        }
    }

    /// Formats `value` into exactly `width` characters.
    ///
    /// Values longer than the slot are truncated, keeping the leading characters.
    pub fn format(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().take(self.width).collect();
        let padding = self.width - chars.len();
        match self.justify {
            Justify::Left => chars.extend(std::iter::repeat(self.fill).take(padding)),
            Justify::Right => {
                chars.splice(0..0, std::iter::repeat(self.fill).take(padding));
            }
        }
        chars.into_iter().collect()
    }

    /// Appends `value` to `out`, formatted for this slot.
    pub fn write_text(&self, out: &mut String, value: &str) {
        debug_assert_eq!(out.chars().count(), self.start, "{} written out of order", self.name);
        out.push_str(&self.format(value));
    }

    /// Appends an integer to `out`, failing if it needs more digits than the slot holds.
    pub fn write_number(&self, out: &mut String, value: u64) -> std::result::Result<(), FieldError> {
        let digits = value.to_string();
        if digits.len() > self.width {
            return Err(FieldError {
                field: self.name,
                message: format!("must fit in {} digits", self.width),
            });
        }
        self.write_text(out, &digits);
        Ok(())
    }

    /// Appends `width` spaces, used for absent optional values.
    pub fn write_blank(&self, out: &mut String) {
        debug_assert_eq!(out.chars().count(), self.start, "{} written out of order", self.name);
        out.extend(std::iter::repeat(' ').take(self.width));
    }

    /// Returns the raw contents of this slot.
    ///
    /// Columns beyond the end of a short line are treated as absent.
    pub fn extract(&self, line: &str) -> String {
        line.chars().skip(self.start).take(self.width).collect()
    }

    /// Returns the slot contents with surrounding whitespace removed.
    pub fn extract_trimmed(&self, line: &str) -> String {
        self.extract(line).trim().to_string()
    }

    /// Returns a left-justified text value without its fill.
    ///
    /// Only trailing padding is removed, so leading spaces that were part of
    /// the written value survive.
    pub fn extract_text(&self, line: &str) -> String {
        self.extract(line).trim_end().to_string()
    }

    /// Parses the slot as an unsigned integer; a blank slot reads as zero.
    pub fn extract_number(&self, line: &str, line_no: usize) -> std::result::Result<u64, ParseError> {
        let raw = self.extract_trimmed(line);
        if raw.is_empty() {
            return Ok(0);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidField {
                line: line_no,
                field: self.name,
            });
        }
        raw.parse().map_err(|_| ParseError::InvalidField {
            line: line_no,
            field: self.name,
        })
    }
}

/// Pads a partially written record with spaces up to [`RECORD_WIDTH`].
pub fn fill_record(out: &mut String) {
    let written = out.chars().count();
    out.extend(std::iter::repeat(' ').take(RECORD_WIDTH.saturating_sub(written)));
}
