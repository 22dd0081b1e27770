// File: src/verdict.rs
// Purpose: Per-field and per-record validation outcomes

use crate::rules::RuleKind;
use serde::Serialize;
use std::collections::HashMap;

/// A rule that rejected a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FailedRule {
    pub rule: RuleKind,
    pub message_key: &'static str,
}

impl From<RuleKind> for FailedRule {
    fn from(rule: RuleKind) -> Self {
        Self {
            rule,
            message_key: rule.message_key(),
        }
    }
}

/// Outcome for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldVerdict {
    pub field: String,
    pub failed: Vec<FailedRule>,
}

impl FieldVerdict {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            failed: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn fail(&mut self, rule: RuleKind) {
        self.failed.push(rule.into());
    }

    pub fn failed_rules(&self) -> Vec<RuleKind> {
        self.failed.iter().map(|failed| failed.rule).collect()
    }
}

/// Outcome for a whole submitted record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordVerdict {
    fields: Vec<FieldVerdict>,
}

impl RecordVerdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, verdict: FieldVerdict) {
        self.fields.push(verdict);
    }

    /// True when no field failed
    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(FieldVerdict::is_valid)
    }

    pub fn field(&self, name: &str) -> Option<&FieldVerdict> {
        self.fields.iter().find(|verdict| verdict.field == name)
    }

    pub fn fields(&self) -> &[FieldVerdict] {
        &self.fields
    }

    /// Fields with at least one failed rule
    pub fn invalid_fields(&self) -> impl Iterator<Item = &FieldVerdict> {
        self.fields.iter().filter(|verdict| !verdict.is_valid())
    }

    /// Field name to the message key of its first failed rule, ready for
    /// rendering next to the form inputs
    pub fn error_map(&self) -> HashMap<String, String> {
        self.invalid_fields()
            .filter_map(|verdict| {
                verdict
                    .failed
                    .first()
                    .map(|failed| (verdict.field.clone(), failed.message_key.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_validity_aggregates_fields() {
        let mut record = RecordVerdict::new();
        assert!(record.is_valid());

        record.push(FieldVerdict::new("username"));
        assert!(record.is_valid());

        let mut email = FieldVerdict::new("email");
        email.fail(RuleKind::Required);
        email.fail(RuleKind::Email);
        record.push(email);

        assert!(!record.is_valid());
        assert_eq!(record.invalid_fields().count(), 1);
        assert_eq!(
            record.field("email").unwrap().failed_rules(),
            vec![RuleKind::Required, RuleKind::Email]
        );
    }

    #[test]
    fn test_error_map_uses_first_failure() {
        let mut record = RecordVerdict::new();
        let mut password = FieldVerdict::new("password");
        password.fail(RuleKind::Min);
        password.fail(RuleKind::MustInclude);
        record.push(password);
        record.push(FieldVerdict::new("email"));

        let errors = record.error_map();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["password"], "validationErrorMin");
    }

    #[test]
    fn test_serializes_for_json_responses() {
        let mut verdict = FieldVerdict::new("username");
        verdict.fail(RuleKind::UniqueDb);

        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field": "username",
                "failed": [{ "rule": "uniqueDb", "message_key": "validationErrorUniqueDb" }]
            })
        );
    }
}
