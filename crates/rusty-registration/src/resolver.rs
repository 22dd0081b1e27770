// File: src/resolver.rs
// Purpose: Picks the rule-set for a request from the plugin, controller and action that sent it

use crate::config::PluginConfig;
use crate::error::ResolveError;
use crate::ports::{ConfigurationSource, PluginRegistry};
use crate::request_context::{RequestContext, RequestParams};
use crate::rules::RuleSet;
use std::fmt;
use std::sync::Arc;

/// The only controllers whose rule-sets a request may select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerName {
    New,
    Edit,
    Invitation,
}

impl ControllerName {
    /// Map the submitted controller label.
    ///
    /// Only the exact labels `Edit` and `Invitation` select those controllers;
    /// anything else, including lowercase spellings, falls back to `New`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Edit" => ControllerName::Edit,
            "Invitation" => ControllerName::Invitation,
            _ => ControllerName::New,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControllerName::New => "new",
            ControllerName::Edit => "edit",
            ControllerName::Invitation => "invitation",
        }
    }
}

impl fmt::Display for ControllerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings key below the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationName {
    Validation,
    ValidationEdit,
}

impl ValidationName {
    /// `validationEdit` is used only for the edit action of the invitation controller
    pub fn for_context(controller: ControllerName, action: &str) -> Self {
        if controller == ControllerName::Invitation && action == "edit" {
            ValidationName::ValidationEdit
        } else {
            ValidationName::Validation
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationName::Validation => "validation",
            ValidationName::ValidationEdit => "validationEdit",
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    pub plugin: String,
    pub controller: ControllerName,
    pub action: String,
    pub validation: ValidationName,
    pub rule_set: RuleSet,
}

/// Works out which rule-set applies to a request.
///
/// Resolution is stateless: every call reads only the request passed in.
#[derive(Clone)]
pub struct ContextResolver {
    config: Arc<dyn ConfigurationSource>,
    plugins: Arc<dyn PluginRegistry>,
    plugin: PluginConfig,
}

impl fmt::Debug for ContextResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextResolver")
            .field("plugin", &self.plugin)
            .finish()
    }
}

impl ContextResolver {
    pub fn new(config: Arc<dyn ConfigurationSource>, plugins: Arc<dyn PluginRegistry>) -> Self {
        Self {
            config,
            plugins,
            plugin: PluginConfig::default(),
        }
    }

    pub fn with_plugin_config(mut self, plugin: PluginConfig) -> Self {
        self.plugin = plugin;
        self
    }

    /// Request parameters belonging to any of our plugins
    pub fn plugin_variables(&self, request: &RequestContext) -> RequestParams {
        request.all_params().with_prefix(&self.plugin.prefix)
    }

    /// Namespace of the plugin that sent the request; the first in lexical
    /// order when several are present
    pub fn plugin_name(&self, variables: &RequestParams) -> Option<String> {
        variables.keys().next().map(str::to_string)
    }

    /// Resolve the applicable rule-set.
    ///
    /// `Ok(None)` means the request carries no plugin parameters, so there is
    /// nothing to validate. A plugin that is not placed on the current page is
    /// a hard error.
    pub fn resolve(&self, request: &RequestContext) -> Result<Option<ResolvedContext>, ResolveError> {
        let variables = self.plugin_variables(request);
        let Some(plugin) = self.plugin_name(&variables) else {
            tracing::debug!("No plugin parameters in request, nothing to resolve");
            return Ok(None);
        };

        self.check_allowed_plugin(&plugin, request.page_id)?;

        let referrer = |key: &str| {
            variables
                .get_path(&[plugin.as_str(), "__referrer", key])
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let controller = ControllerName::from_label(&referrer("@controller"));
        let action = referrer("@action");
        let validation = ValidationName::for_context(controller, &action);

        let settings = self.config.validation_settings(&self.plugin.extension);
        let rule_set = match settings.rule_set(controller.as_str(), validation.as_str()) {
            Some(rule_set) => rule_set.clone(),
            None => {
                tracing::warn!(
                    "No rule-set configured at [{}][{}]",
                    controller,
                    validation.as_str()
                );
                RuleSet::default()
            }
        };

        tracing::debug!(
            "Resolved plugin {} to [{}][{}] with {} fields",
            plugin,
            controller,
            validation.as_str(),
            rule_set.len()
        );

        Ok(Some(ResolvedContext {
            plugin,
            controller,
            action,
            validation,
            rule_set,
        }))
    }

    /// Just the rule-set; empty when the request has no plugin parameters
    pub fn rule_set(&self, request: &RequestContext) -> Result<RuleSet, ResolveError> {
        Ok(self
            .resolve(request)?
            .map(|resolved| resolved.rule_set)
            .unwrap_or_default())
    }

    fn check_allowed_plugin(&self, plugin: &str, page_id: u64) -> Result<(), ResolveError> {
        if self.plugins.is_plugin_on_page(page_id, plugin) {
            return Ok(());
        }

        tracing::error!("Plugin {} is not placed on page {}", plugin, page_id);
        Err(ResolveError::PluginNotAllowed {
            plugin: plugin.to_string(),
            page_id,
        })
    }
}
