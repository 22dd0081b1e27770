//! Numeric validation functions

use once_cell::sync::Lazy;
use regex::Regex;

// Decimal number with optional sign, fraction and exponent.
static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
});

/// Whether a submitted string is a number.
///
/// Surrounding whitespace is tolerated, hexadecimal and the empty string are
/// not.
///
/// ```
/// use rusty_forms_validation::is_numeric;
/// assert!(is_numeric(" 42"));
/// assert!(is_numeric("-1.5e3"));
/// assert!(!is_numeric("0x1A"));
/// ```
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'));
    NUMERIC_REGEX.is_match(trimmed)
}

/// Parses a rule parameter that must be a non-negative integer
pub fn parse_limit(param: &str) -> Option<usize> {
    param.trim().parse().ok()
}
