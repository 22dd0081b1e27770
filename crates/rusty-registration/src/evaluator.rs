// File: src/evaluator.rs
// Purpose: Applies single rules to field values

use crate::events::{EventDispatcher, UniqueUserEvent, UniqueUserListener};
use crate::ports::UserStore;
use crate::rules::{Rule, RuleKind};
use crate::value::{FieldValue, UserRecord};
use crate::verdict::FieldVerdict;
use rusty_forms_validation as predicates;
use std::sync::Arc;

/// What the evaluator knows about the field being checked
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub field: &'a str,
    /// Record the field belongs to; also the record excluded from uniqueness lookups
    pub user: Option<&'a UserRecord>,
    /// Explicit comparison value for `sameAs`; otherwise the rule parameter
    /// names a field of `user`
    pub compare_to: Option<&'a FieldValue>,
}

impl<'a> FieldContext<'a> {
    pub fn new(field: &'a str) -> Self {
        Self {
            field,
            user: None,
            compare_to: None,
        }
    }

    pub fn with_user(mut self, user: &'a UserRecord) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_compare_to(mut self, value: &'a FieldValue) -> Self {
        self.compare_to = Some(value);
        self
    }
}

/// Evaluates rules against values.
///
/// Every check answers with a plain `bool`; a malformed parameter (for
/// example `min = "three"` or an unknown date format) is a failed check,
/// never an error.
#[derive(Clone)]
pub struct RuleEvaluator {
    users: Arc<dyn UserStore>,
    events: EventDispatcher,
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator")
            .field("events", &self.events)
            .finish()
    }
}

impl RuleEvaluator {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            events: EventDispatcher::new(),
        }
    }

    /// Register a listener that may override `uniqueDb` verdicts
    pub fn with_listener(mut self, listener: impl UniqueUserListener + 'static) -> Self {
        self.events.register(Arc::new(listener));
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    /// No other user in the configured storage folder has this value
    pub fn is_unique_in_page(&self, value: &str, field: &str, user: Option<&UserRecord>) -> bool {
        let exclude = user.and_then(UserRecord::uid);
        self.users.find_in_scope(field, value, exclude).is_none()
    }

    /// No other user anywhere has this value, unless a listener decides otherwise
    pub fn is_unique_in_db(&self, value: &str, field: &str, user: Option<&UserRecord>) -> bool {
        let exclude = user.and_then(UserRecord::uid);
        let unique = self.users.find_globally(field, value, exclude).is_none();

        self.events
            .dispatch(UniqueUserEvent::new(value, field, user.cloned(), unique))
            .is_unique()
    }

    /// Checks one rule against one value
    pub fn evaluate(&self, rule: &Rule, value: &FieldValue, ctx: &FieldContext<'_>) -> bool {
        let text = value.as_text();
        let param = rule.param.as_str();

        match rule.kind {
            RuleKind::Required => value.is_present(),
            RuleKind::Email => predicates::is_valid_email(&text),
            RuleKind::Min => predicates::parse_limit(param)
                .is_some_and(|min| predicates::has_min_length(&text, min)),
            RuleKind::Max => predicates::parse_limit(param)
                .is_some_and(|max| predicates::has_max_length(&text, max)),
            RuleKind::Int => predicates::is_numeric(&text),
            RuleKind::Letters => predicates::is_letters(&text),
            RuleKind::UnicodeLetters => predicates::is_unicode_letters(&text),
            RuleKind::UniquePage => self.is_unique_in_page(&text, ctx.field, ctx.user),
            RuleKind::UniqueDb => self.is_unique_in_db(&text, ctx.field, ctx.user),
            RuleKind::MustInclude => predicates::must_include(&text, param),
            RuleKind::MustNotInclude => predicates::must_not_include(&text, param),
            RuleKind::InList => predicates::is_in_list(&text, param),
            RuleKind::SameAs => {
                let other = ctx
                    .compare_to
                    .or_else(|| ctx.user.and_then(|user| user.get(param)))
                    .unwrap_or(&FieldValue::Null);
                // strict: a number never equals its string form
                match (value, other) {
                    (FieldValue::String(a), FieldValue::String(b)) => predicates::is_same_as(a, b),
                    _ => value == other,
                }
            }
            RuleKind::Date => predicates::is_valid_date_str(&text, param),
        }
    }

    /// Runs all rules of a field and collects the failures.
    ///
    /// Blank values only go through `required` and `sameAs`.
    pub fn check_field(&self, rules: &[Rule], value: &FieldValue, ctx: &FieldContext<'_>) -> FieldVerdict {
        let mut verdict = FieldVerdict::new(ctx.field);
        let blank = value.is_blank();

        for rule in rules {
            if blank && !rule.kind.checks_blank_values() {
                continue;
            }
            if !self.evaluate(rule, value, ctx) {
                tracing::debug!("Field {} failed rule {} ({:?})", ctx.field, rule.kind, rule.param);
                verdict.fail(rule.kind);
            }
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    /// Store holding `(field, value, uid)` rows
    #[derive(Default)]
    struct MemoryStore {
        scoped: Vec<(String, String, u64)>,
        global: Vec<(String, String, u64)>,
        lookups: Mutex<Vec<Option<u64>>>,
    }

    fn find(rows: &[(String, String, u64)], field: &str, value: &str, exclude: Option<u64>) -> Option<UserRecord> {
        rows.iter()
            .find(|(f, v, uid)| f == field && v == value && Some(*uid) != exclude)
            .map(|(f, v, uid)| UserRecord::existing(*uid).with(f.as_str(), v.as_str()))
    }

    impl UserStore for MemoryStore {
        fn find_in_scope(&self, field: &str, value: &str, exclude_uid: Option<u64>) -> Option<UserRecord> {
            self.lookups.lock().unwrap().push(exclude_uid);
            find(&self.scoped, field, value, exclude_uid)
        }

        fn find_globally(&self, field: &str, value: &str, exclude_uid: Option<u64>) -> Option<UserRecord> {
            self.lookups.lock().unwrap().push(exclude_uid);
            find(&self.global, field, value, exclude_uid)
        }
    }

    fn evaluator() -> RuleEvaluator {
        RuleEvaluator::new(Arc::new(MemoryStore::default()))
    }

    fn check(kind: RuleKind, param: &str, value: impl Into<FieldValue>) -> bool {
        evaluator().evaluate(&Rule::new(kind, param), &value.into(), &FieldContext::new("field"))
    }

    #[rstest]
    #[case(RuleKind::Required, "1", "x", true)]
    #[case(RuleKind::Required, "1", "", false)]
    #[case(RuleKind::Email, "1", "user@example.com", true)]
    #[case(RuleKind::Email, "1", "user@", false)]
    #[case(RuleKind::Min, "3", "abc", true)]
    #[case(RuleKind::Min, "3", "ab", false)]
    #[case(RuleKind::Min, "1", "é", true)]
    #[case(RuleKind::Max, "3", "abc", true)]
    #[case(RuleKind::Max, "3", "abcd", false)]
    #[case(RuleKind::Max, "2", "éé", true)]
    #[case(RuleKind::Int, "1", "42", true)]
    #[case(RuleKind::Int, "1", "4two", false)]
    #[case(RuleKind::Letters, "1", "foo-bar", true)]
    #[case(RuleKind::Letters, "1", "foo-bar_1", false)]
    #[case(RuleKind::UnicodeLetters, "1", "café", true)]
    #[case(RuleKind::UnicodeLetters, "1", "café1", false)]
    #[case(RuleKind::MustInclude, "number,uppercase,special", "Abc123!", true)]
    #[case(RuleKind::MustInclude, "number", "abc", false)]
    #[case(RuleKind::MustNotInclude, "number", "abc", true)]
    #[case(RuleKind::MustNotInclude, "number", "abc1", false)]
    #[case(RuleKind::InList, "a,b,c", "a,b", true)]
    #[case(RuleKind::InList, "a,b,c", "a,d", false)]
    #[case(RuleKind::Date, "d.m.Y", "29.02.2024", true)]
    #[case(RuleKind::Date, "d.m.Y", "29.02.2023", false)]
    #[case(RuleKind::Date, "m/d/Y", "13/40/2024", false)]
    fn test_rules(#[case] kind: RuleKind, #[case] param: &str, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(check(kind, param, value), expected);
    }

    #[test]
    fn test_malformed_parameters_fail() {
        assert!(!check(RuleKind::Min, "three", "abcdef"));
        assert!(!check(RuleKind::Max, "", "a"));
        assert!(!check(RuleKind::Date, "Y-m-d", "2024-02-29"));
    }

    #[test]
    fn test_required_on_non_string_values() {
        assert!(check(RuleKind::Required, "1", 0));
        assert!(check(RuleKind::Required, "1", vec!["a"]));
        assert!(!check(RuleKind::Required, "1", FieldValue::List(vec![])));
        assert!(!check(RuleKind::Required, "1", FieldValue::Null));
    }

    #[test]
    fn test_same_as_reads_other_field_of_user() {
        let user = UserRecord::new()
            .with("password", "s3cret")
            .with("passwordRepeat", "s3cret");
        let rule = Rule::new(RuleKind::SameAs, "password");
        let ctx = FieldContext::new("passwordRepeat").with_user(&user);

        assert!(evaluator().evaluate(&rule, &FieldValue::from("s3cret"), &ctx));
        assert!(!evaluator().evaluate(&rule, &FieldValue::from("other"), &ctx));
    }

    #[test]
    fn test_same_as_prefers_explicit_value() {
        let other = FieldValue::from("x");
        let rule = Rule::new(RuleKind::SameAs, "password");
        let ctx = FieldContext::new("passwordRepeat").with_compare_to(&other);

        assert!(evaluator().evaluate(&rule, &FieldValue::from("x"), &ctx));
        assert!(!evaluator().evaluate(&rule, &FieldValue::from("y"), &ctx));
    }

    #[test]
    fn test_same_as_does_not_mix_types() {
        let rule = Rule::new(RuleKind::SameAs, "other");
        let one = FieldValue::from("1");
        let yes = FieldValue::from(true);
        let number = FieldValue::from(1);

        let against = |other: &FieldValue, value: &FieldValue| {
            evaluator().evaluate(&rule, value, &FieldContext::new("field").with_compare_to(other))
        };
        assert!(!against(&one, &number));
        assert!(!against(&yes, &one));
        assert!(against(&number, &FieldValue::from(1)));
        assert!(against(&FieldValue::Null, &FieldValue::Null));
        assert!(!against(&FieldValue::Null, &FieldValue::from("")));
    }

    #[test]
    fn test_uniqueness_excludes_own_record() {
        let store = Arc::new(MemoryStore {
            scoped: vec![("username".into(), "alice".into(), 5)],
            global: vec![("email".into(), "a@example.com".into(), 5)],
            ..Default::default()
        });
        let evaluator = RuleEvaluator::new(store.clone());

        let newcomer = UserRecord::new();
        let alice = UserRecord::existing(5);

        assert!(!evaluator.is_unique_in_page("alice", "username", Some(&newcomer)));
        assert!(evaluator.is_unique_in_page("alice", "username", Some(&alice)));
        assert!(evaluator.is_unique_in_page("bob", "username", None));

        assert!(!evaluator.is_unique_in_db("a@example.com", "email", None));
        assert!(evaluator.is_unique_in_db("a@example.com", "email", Some(&alice)));

        assert_eq!(
            *store.lookups.lock().unwrap(),
            vec![None, Some(5), None, None, Some(5)]
        );
    }

    #[test]
    fn test_listener_override_wins_over_lookup() {
        let evaluator = evaluator().with_listener(|event: &UniqueUserEvent| {
            (event.value == "reserved").then_some(false)
        });

        assert!(!evaluator.is_unique_in_db("reserved", "username", None));
        assert!(evaluator.is_unique_in_db("free", "username", None));
    }

    #[test]
    fn test_shared_dispatcher_applies_listeners_in_order() {
        let mut events = EventDispatcher::new();
        events.register(Arc::new(|_: &UniqueUserEvent| -> Option<bool> { Some(false) }));
        events.register(Arc::new(|event: &UniqueUserEvent| {
            (event.value == "vip").then_some(true)
        }));
        let evaluator = evaluator().with_events(events);

        assert!(!evaluator.is_unique_in_db("anyone", "username", None));
        assert!(evaluator.is_unique_in_db("vip", "username", None));
    }

    #[test]
    fn test_listener_sees_record_and_lookup_result() {
        let store = Arc::new(MemoryStore {
            global: vec![("email".into(), "taken@example.com".into(), 9)],
            ..Default::default()
        });
        let evaluator = RuleEvaluator::new(store).with_listener(|event: &UniqueUserEvent| {
            assert_eq!(event.field, "email");
            assert_eq!(event.user.as_ref().and_then(UserRecord::uid), Some(3));
            // let duplicates through
            (!event.is_unique()).then_some(true)
        });

        let user = UserRecord::existing(3);
        assert!(evaluator.is_unique_in_db("taken@example.com", "email", Some(&user)));
    }

    #[test]
    fn test_check_field_skips_blank_optional_values() {
        let rules = vec![
            Rule::new(RuleKind::Min, "3"),
            Rule::flag(RuleKind::Email),
            Rule::flag(RuleKind::UniqueDb),
        ];
        let verdict = evaluator().check_field(&rules, &FieldValue::from(""), &FieldContext::new("email"));
        assert!(verdict.is_valid());

        let rules = vec![Rule::flag(RuleKind::Required), Rule::new(RuleKind::Min, "3")];
        let verdict = evaluator().check_field(&rules, &FieldValue::Null, &FieldContext::new("email"));
        assert_eq!(verdict.failed_rules(), vec![RuleKind::Required]);
    }

    #[test]
    fn test_check_field_collects_all_failures_in_order() {
        let rules = vec![
            Rule::new(RuleKind::Min, "8"),
            Rule::new(RuleKind::MustInclude, "number,uppercase"),
            Rule::new(RuleKind::MustNotInclude, "space"),
        ];
        let verdict = evaluator().check_field(&rules, &FieldValue::from("ab c"), &FieldContext::new("password"));
        assert_eq!(
            verdict.failed_rules(),
            vec![RuleKind::Min, RuleKind::MustInclude, RuleKind::MustNotInclude]
        );
    }
}
