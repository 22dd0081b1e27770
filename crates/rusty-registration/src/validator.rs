// File: src/validator.rs
// Purpose: Whole-record (server side) and single-field (client side) validation

use crate::error::ResolveError;
use crate::evaluator::{FieldContext, RuleEvaluator};
use crate::request_context::RequestContext;
use crate::resolver::ContextResolver;
use crate::rules::{parse_inline, RuleSet};
use crate::value::{FieldValue, UserRecord};
use crate::verdict::{FieldVerdict, RecordVerdict};

/// Validates a submitted user record against the rule-set its request selects
#[derive(Debug, Clone)]
pub struct ServersideValidator {
    resolver: ContextResolver,
    evaluator: RuleEvaluator,
}

impl ServersideValidator {
    pub fn new(resolver: ContextResolver, evaluator: RuleEvaluator) -> Self {
        Self { resolver, evaluator }
    }

    /// Resolve the rule-set for `request`, then validate `user` with it.
    ///
    /// Fails only when the request names a plugin that is not placed on the
    /// current page; rule failures are reported in the verdict.
    pub fn validate(&self, request: &RequestContext, user: &UserRecord) -> Result<RecordVerdict, ResolveError> {
        let rule_set = self.resolver.rule_set(request)?;
        Ok(self.validate_with(&rule_set, user))
    }

    /// Validate `user` against an already resolved rule-set.
    ///
    /// Fields missing from the record are treated as empty.
    pub fn validate_with(&self, rule_set: &RuleSet, user: &UserRecord) -> RecordVerdict {
        let mut verdict = RecordVerdict::new();

        for field_rules in rule_set.iter() {
            let value = user.get(&field_rules.field).unwrap_or(&FieldValue::Null);
            let ctx = FieldContext::new(&field_rules.field).with_user(user);
            verdict.push(self.evaluator.check_field(&field_rules.rules, value, &ctx));
        }

        if !verdict.is_valid() {
            tracing::debug!(
                "Record rejected, invalid fields: {:?}",
                verdict.invalid_fields().map(|f| f.field.as_str()).collect::<Vec<_>>()
            );
        }
        verdict
    }
}

/// Validates one field at a time, e.g. while the user is typing.
///
/// Rules come as an inline string like `required,min(3),sameAs(password)`;
/// see [`parse_inline`]. The request goes through the same context resolution
/// as a full submission, so a plugin that is not placed on the page cannot
/// reach the uniqueness lookups.
#[derive(Debug, Clone)]
pub struct ClientsideValidator {
    resolver: ContextResolver,
    evaluator: RuleEvaluator,
}

impl ClientsideValidator {
    pub fn new(resolver: ContextResolver, evaluator: RuleEvaluator) -> Self {
        Self { resolver, evaluator }
    }

    /// Check `value` for `field`.
    ///
    /// `additional_value` is the value `sameAs` compares against. `user` is
    /// the record being edited, if any, so uniqueness checks skip it.
    pub fn validate_field(
        &self,
        request: &RequestContext,
        field: &str,
        value: &FieldValue,
        rules: &str,
        additional_value: Option<&FieldValue>,
        user: Option<&UserRecord>,
    ) -> Result<FieldVerdict, ResolveError> {
        self.resolver.resolve(request)?;

        let rules = parse_inline(rules);
        let mut ctx = FieldContext::new(field);
        ctx.user = user;
        ctx.compare_to = additional_value;
        Ok(self.evaluator.check_field(&rules, value, &ctx))
    }
}
