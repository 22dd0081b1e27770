//! Email validation functions

/// Validates email address format
///
/// Checks for:
/// - Exactly one '@' with content on both sides
/// - Local part of at most 64 characters from the usual atom set
/// - Domain of dot-separated labels, no leading/trailing dot or hyphen
/// - Top level domain of at least 2 letters
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.len() > 255 {
        return false;
    }

    // Local part: dot separated atoms, no empty atom
    let valid_local_char = |c: char| {
        c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c)
    };
    if local.split('.').any(|atom| atom.is_empty() || !atom.chars().all(valid_local_char)) {
        return false;
    }

    // Domain: at least two labels, each 1-63 chars, no edge hyphens
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let label_ok = |label: &&str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    };
    if !labels.iter().all(label_ok) {
        return false;
    }

    // TLD must be at least 2 letters
    labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
}
