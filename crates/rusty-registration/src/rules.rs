// File: src/rules.rs
// Purpose: Rule vocabulary, per-field rule lists and rule-sets

use crate::error::UnknownRule;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every rule the evaluator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    Email,
    Min,
    Max,
    Int,
    Letters,
    UnicodeLetters,
    UniquePage,
    UniqueDb,
    MustInclude,
    MustNotInclude,
    InList,
    SameAs,
    Date,
}

impl RuleKind {
    pub const ALL: [RuleKind; 14] = [
        RuleKind::Required,
        RuleKind::Email,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Int,
        RuleKind::Letters,
        RuleKind::UnicodeLetters,
        RuleKind::UniquePage,
        RuleKind::UniqueDb,
        RuleKind::MustInclude,
        RuleKind::MustNotInclude,
        RuleKind::InList,
        RuleKind::SameAs,
        RuleKind::Date,
    ];

    /// Canonical configuration name
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Email => "email",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Int => "int",
            RuleKind::Letters => "letters",
            RuleKind::UnicodeLetters => "unicodeLetters",
            RuleKind::UniquePage => "uniquePage",
            RuleKind::UniqueDb => "uniqueDb",
            RuleKind::MustInclude => "mustInclude",
            RuleKind::MustNotInclude => "mustNotInclude",
            RuleKind::InList => "inList",
            RuleKind::SameAs => "sameAs",
            RuleKind::Date => "date",
        }
    }

    /// Localisation key shown to the user when the rule fails
    pub fn message_key(self) -> &'static str {
        match self {
            RuleKind::Required => "validationErrorRequired",
            RuleKind::Email => "validationErrorEmail",
            RuleKind::Min => "validationErrorMin",
            RuleKind::Max => "validationErrorMax",
            RuleKind::Int => "validationErrorInt",
            RuleKind::Letters => "validationErrorLetters",
            RuleKind::UnicodeLetters => "validationErrorUnicodeLetters",
            RuleKind::UniquePage => "validationErrorUniquePage",
            RuleKind::UniqueDb => "validationErrorUniqueDb",
            RuleKind::MustInclude => "validationErrorMustInclude",
            RuleKind::MustNotInclude => "validationErrorMustNotInclude",
            RuleKind::InList => "validationErrorInList",
            RuleKind::SameAs => "validationErrorSameAs",
            RuleKind::Date => "validationErrorDate",
        }
    }

    /// `required` and `sameAs` also run on empty values; everything else
    /// only checks what the user actually filled in.
    pub fn checks_blank_values(self) -> bool {
        matches!(self, RuleKind::Required | RuleKind::SameAs)
    }
}

impl FromStr for RuleKind {
    type Err = UnknownRule;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        // Long forms are the names older configurations use
        let kind = match name {
            "required" => RuleKind::Required,
            "email" => RuleKind::Email,
            "min" => RuleKind::Min,
            "max" => RuleKind::Max,
            "int" | "intOnly" => RuleKind::Int,
            "letters" | "lettersOnly" => RuleKind::Letters,
            "unicodeLetters" | "unicodeLettersOnly" => RuleKind::UnicodeLetters,
            "uniquePage" | "uniqueInPage" => RuleKind::UniquePage,
            "uniqueDb" | "uniqueInDb" => RuleKind::UniqueDb,
            "mustInclude" => RuleKind::MustInclude,
            "mustNotInclude" => RuleKind::MustNotInclude,
            "inList" => RuleKind::InList,
            "sameAs" => RuleKind::SameAs,
            "date" => RuleKind::Date,
            other => return Err(UnknownRule(other.to_string())),
        };
        Ok(kind)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One rule with its raw parameter, e.g. `min` with `"3"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: RuleKind,
    pub param: String,
}

impl Rule {
    pub fn new(kind: RuleKind, param: impl Into<String>) -> Self {
        Self {
            kind,
            param: param.into(),
        }
    }

    /// A rule without a meaningful parameter
    pub fn flag(kind: RuleKind) -> Self {
        Self::new(kind, "1")
    }

    pub fn parse(name: &str, param: impl Into<String>) -> Result<Self, UnknownRule> {
        Ok(Self::new(name.parse()?, param))
    }
}

/// Rules configured for one field, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub field: String,
    pub rules: Vec<Rule>,
}

/// All field rules active for one controller/validation context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) the rules for a field
    pub fn field(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        let field = field.into();
        match self.fields.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => entry.rules.extend(rules),
            None => self.fields.push(FieldRules {
                field,
                rules: rules.into_iter().collect(),
            }),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|entry| entry.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parses an inline rule string as sent by client-side validation.
///
/// Rules are comma separated, a parameter goes in parentheses and list
/// parameters use `|` instead of commas:
///
/// ```
/// use rusty_registration::rules::{parse_inline, RuleKind};
///
/// let rules = parse_inline("required,min(3),mustInclude(number|uppercase)");
/// assert_eq!(rules[1].kind, RuleKind::Min);
/// assert_eq!(rules[2].param, "number,uppercase");
/// ```
///
/// Unknown rule names are dropped.
pub fn parse_inline(inline: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in inline.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                rules.extend(parse_inline_token(&inline[start..idx]));
                start = idx + 1;
            }
            _ => {}
        }
    }
    rules.extend(parse_inline_token(&inline[start..]));
    rules
}

fn parse_inline_token(token: &str) -> Option<Rule> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let (name, param) = match token.split_once('(') {
        Some((name, rest)) => (name.trim(), rest.strip_suffix(')').unwrap_or(rest).replace('|', ",")),
        None => (token, "1".to_string()),
    };

    match Rule::parse(name, param) {
        Ok(rule) => Some(rule),
        Err(err) => {
            tracing::warn!("Ignoring inline rule: {}", err);
            None
        }
    }
}

/// Raw parameter as it may appear in a TOML rule table
#[derive(Deserialize)]
#[serde(untagged)]
enum RawParam {
    Flag(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawParam {
    /// `false` switches a rule off
    fn into_param(self) -> Option<String> {
        match self {
            RawParam::Flag(true) => Some("1".to_string()),
            RawParam::Flag(false) => None,
            RawParam::Int(n) => Some(n.to_string()),
            RawParam::Float(n) => Some(n.to_string()),
            RawParam::Text(s) => Some(s),
        }
    }
}

/// Ordered rule list read from a `rule = param` table
struct RuleList(Vec<Rule>);

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleListVisitor;

        impl<'de> Visitor<'de> for RuleListVisitor {
            type Value = RuleList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of rule names to rule parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RuleList, A::Error> {
                let mut rules = Vec::new();
                while let Some((name, raw)) = map.next_entry::<String, RawParam>()? {
                    let Some(param) = raw.into_param() else {
                        continue;
                    };
                    match Rule::parse(&name, param) {
                        Ok(rule) => rules.push(rule),
                        Err(err) => tracing::warn!("Skipping configured rule: {}", err),
                    }
                }
                Ok(RuleList(rules))
            }
        }

        deserializer.deserialize_map(RuleListVisitor)
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of field names to rule tables")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RuleSet, A::Error> {
                let mut set = RuleSet::new();
                while let Some((field, RuleList(rules))) = map.next_entry::<String, RuleList>()? {
                    set = set.field(field, rules);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}
