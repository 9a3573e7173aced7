//! Declarative field rules shared by every record type.
//!
//! Each record holds a static table of [`Rule`]s. [`check`] evaluates a
//! table against a value and collects every violation, so callers can either
//! fail fast through `validate` or enumerate problems through `errors`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// BSB pattern `XXX-XXX`, ASCII digits only.
static BSB_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}-[0-9]{3}$").expect("Invalid BSB regex"));

/// Characters permitted by the BECS direct entry character set.
static BECS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9 +\-@$!%&()*./#=:;?,'\[\]_^]*$").expect("Invalid BECS regex")
});

/// A single constraint on one field of `T`.
pub struct Rule<T> {
    pub field: &'static str,
    pub message: &'static str,
    pub check: fn(&T) -> bool,
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Raised when a record with invalid field values is rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{record} data is invalid: {}", join(.errors))]
pub struct ValidationError {
    /// Record type that failed, e.g. `"Headers"`.
    pub record: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Returns `true` if any error concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Evaluates every rule in order and returns the violations.
pub fn check<T>(target: &T, rules: &[Rule<T>]) -> Vec<FieldError> {
    rules
        .iter()
        .filter(|rule| !(rule.check)(target))
        .map(|rule| FieldError {
            field: rule.field,
            message: rule.message.to_string(),
        })
        .collect()
}

/// Runs [`check`] and turns any violation into a [`ValidationError`].
pub fn validate<T>(
    record: &'static str,
    target: &T,
    rules: &[Rule<T>],
) -> std::result::Result<(), ValidationError> {
    let errors = check(target, rules);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { record, errors })
    }
}

pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_bsb(value: &str) -> bool {
    BSB_REGEX.is_match(value)
}

pub fn is_becs(value: &str) -> bool {
    BECS_REGEX.is_match(value)
}

pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn fits(value: &str, width: usize) -> bool {
    value.chars().count() <= width
}

/// Returns `true` if `value` prints in at most `width` decimal digits.
pub fn fits_digits(value: u64, width: u32) -> bool {
    value < 10u64.pow(width)
}
