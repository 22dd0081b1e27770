// File: src/error.rs
// Purpose: Error types for context resolution and rule parsing

use thiserror::Error;

/// Fatal failures while working out which rule-set applies to a request.
///
/// These abort request processing. They are never folded into a
/// validation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The plugin named in the request is not placed on the current page
    #[error("plugin `{plugin}` is not allowed on page {page_id}")]
    PluginNotAllowed { plugin: String, page_id: u64 },
}

impl ResolveError {
    /// Stable numeric code reported for a plugin that is not on the page
    pub const PLUGIN_NOT_ALLOWED: u32 = 1683551467;

    pub fn code(&self) -> u32 {
        match self {
            ResolveError::PluginNotAllowed { .. } => Self::PLUGIN_NOT_ALLOWED,
        }
    }
}

/// A rule name outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation rule `{0}`")]
pub struct UnknownRule(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_not_allowed_message_and_code() {
        let err = ResolveError::PluginNotAllowed {
            plugin: "tx_femanager_edit".to_string(),
            page_id: 12,
        };
        assert_eq!(err.to_string(), "plugin `tx_femanager_edit` is not allowed on page 12");
        assert_eq!(err.code(), 1683551467);
    }
}
