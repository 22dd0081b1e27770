//! Character class checks used by the `mustInclude` / `mustNotInclude` rules

use crate::string::trim_explode;

/// Character classes that can be required or forbidden in a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// ASCII digit 0-9
    Number,
    /// ASCII letter, hyphen or underscore
    Letter,
    /// ASCII uppercase letter
    Uppercase,
    /// Anything outside `[A-Za-z0-9]`
    Special,
    /// The plain space character
    Space,
}

impl CharClass {
    /// Parse a class name; unknown names yield `None`
    ///
    /// # Examples
    /// ```
    /// use rusty_forms_validation::charset::CharClass;
    /// assert_eq!(CharClass::parse("uppercase"), Some(CharClass::Uppercase));
    /// assert_eq!(CharClass::parse("emoji"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "number" => Some(CharClass::Number),
            "letter" => Some(CharClass::Letter),
            "uppercase" => Some(CharClass::Uppercase),
            "special" => Some(CharClass::Special),
            "space" => Some(CharClass::Space),
            _ => None,
        }
    }

    /// Whether `value` holds at least one character of this class
    pub fn is_present_in(self, value: &str) -> bool {
        match self {
            CharClass::Number => contains_number(value),
            CharClass::Letter => contains_letter(value),
            CharClass::Uppercase => contains_uppercase(value),
            CharClass::Special => contains_special_character(value),
            CharClass::Space => contains_space(value),
        }
    }
}

pub fn contains_number(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

pub fn contains_letter(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_ascii_alphabetic() || c == '-' || c == '_')
}

pub fn contains_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

pub fn contains_special_character(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn contains_space(value: &str) -> bool {
    value.contains(' ')
}

/// Parses a comma separated class list, skipping names that are not classes
pub fn parse_classes(list: &str) -> Vec<CharClass> {
    trim_explode(list)
        .into_iter()
        .filter_map(CharClass::parse)
        .collect()
}

/// Value contains at least one character of every listed class
pub fn must_include(value: &str, classes: &str) -> bool {
    parse_classes(classes)
        .into_iter()
        .all(|class| class.is_present_in(value))
}

/// Value contains no character of any listed class
pub fn must_not_include(value: &str, classes: &str) -> bool {
    !parse_classes(classes)
        .into_iter()
        .any(|class| class.is_present_in(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        assert!(contains_number("abc1"));
        assert!(!contains_number("abc"));

        assert!(contains_letter("1-2"));
        assert!(contains_letter("x"));
        assert!(!contains_letter("123"));

        assert!(contains_uppercase("aBc"));
        assert!(!contains_uppercase("abc"));
        assert!(!contains_uppercase("äÖ"));

        assert!(contains_special_character("abc!"));
        assert!(contains_special_character("café"));
        assert!(contains_special_character("a b"));
        assert!(!contains_special_character("Abc123"));

        assert!(contains_space("a b"));
        assert!(!contains_space("a\tb"));
    }

    #[test]
    fn test_must_include() {
        assert!(must_include("Abc123!", "number,uppercase,special"));
        assert!(!must_include("abc", "number"));
        assert!(!must_include("abc123!", "number,uppercase"));
        assert!(must_include("a b", "space, letter"));
    }

    #[test]
    fn test_must_not_include() {
        assert!(must_not_include("abc", "number"));
        assert!(!must_not_include("abc1", "number"));
        assert!(must_not_include("abc", "uppercase,space,special"));
        assert!(!must_not_include("ab c", "uppercase,space"));
    }

    #[test]
    fn test_unknown_classes_are_ignored() {
        assert!(must_include("abc", "emoji"));
        assert!(must_include("abc", ""));
        assert!(must_not_include("abc1", "emoji"));
        assert!(!must_include("abc", "emoji,number"));
    }
}
