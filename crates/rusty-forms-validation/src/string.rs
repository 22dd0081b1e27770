//! String validation functions

use once_cell::sync::Lazy;
use regex::Regex;

// Unicode letters, hyphen and underscore; at least one character.
static UNICODE_LETTERS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}_-]+$").unwrap());

/// Splits a comma separated list, trimming each entry and dropping empty ones.
///
/// ```
/// use rusty_forms_validation::trim_explode;
/// assert_eq!(trim_explode(" a, b,,c "), vec!["a", "b", "c"]);
/// ```
pub fn trim_explode(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Length in Unicode scalar values, not bytes
pub fn char_length(value: &str) -> usize {
    value.chars().count()
}

pub fn has_min_length(value: &str, min: usize) -> bool {
    char_length(value) >= min
}

pub fn has_max_length(value: &str, max: usize) -> bool {
    char_length(value) <= max
}

/// ASCII letters, hyphen and underscore only. The empty string passes.
pub fn is_letters(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
}

/// Any Unicode letter, hyphen and underscore. The empty string fails.
pub fn is_unicode_letters(value: &str) -> bool {
    UNICODE_LETTERS_REGEX.is_match(value)
}

/// Every entry of the comma separated `value` must appear in `allowed`.
pub fn is_in_list(value: &str, allowed: &str) -> bool {
    let allowed = trim_explode(allowed);
    trim_explode(value)
        .into_iter()
        .all(|item| allowed.contains(&item))
}

/// Exact, case-sensitive equality
pub fn is_same_as(value: &str, other: &str) -> bool {
    value == other
}
