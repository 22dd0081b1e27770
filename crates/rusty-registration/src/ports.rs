// File: src/ports.rs
// Purpose: Collaborators the validator consumes (configuration, user store, plugin placement)

use crate::config::ValidationSettings;
use crate::value::UserRecord;

/// Source of validation settings, usually the parsed [`Config`](crate::Config)
pub trait ConfigurationSource: Send + Sync {
    /// All rule-sets registered for an extension
    fn validation_settings(&self, extension: &str) -> ValidationSettings;
}

/// Read-only uniqueness lookups against stored users.
///
/// `exclude_uid` is the record being edited; it never conflicts with itself.
pub trait UserStore: Send + Sync {
    /// Conflicting user within the configured storage folder
    fn find_in_scope(&self, field: &str, value: &str, exclude_uid: Option<u64>) -> Option<UserRecord>;

    /// Conflicting user anywhere in the user table
    fn find_globally(&self, field: &str, value: &str, exclude_uid: Option<u64>) -> Option<UserRecord>;
}

/// Which plugins are placed on which pages
pub trait PluginRegistry: Send + Sync {
    fn is_plugin_on_page(&self, page_id: u64, plugin: &str) -> bool;
}
