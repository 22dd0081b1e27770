// File: src/events.rs
// Purpose: Listener hook that may override the `uniqueDb` verdict

use crate::value::UserRecord;
use std::sync::Arc;

/// Published after the global uniqueness lookup for a value
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueUserEvent {
    pub value: String,
    pub field: String,
    /// The record being validated, if any
    pub user: Option<UserRecord>,
    unique: bool,
}

impl UniqueUserEvent {
    pub fn new(
        value: impl Into<String>,
        field: impl Into<String>,
        user: Option<UserRecord>,
        unique: bool,
    ) -> Self {
        Self {
            value: value.into(),
            field: field.into(),
            user,
            unique,
        }
    }

    /// Verdict so far: the lookup result, or the latest listener override
    pub fn is_unique(&self) -> bool {
        self.unique
    }
}

/// Custom uniqueness policy, e.g. a check against another system.
///
/// Return `Some(verdict)` to replace the current verdict, `None` to keep it.
pub trait UniqueUserListener: Send + Sync {
    fn on_unique_user(&self, event: &UniqueUserEvent) -> Option<bool>;
}

impl<F> UniqueUserListener for F
where
    F: Fn(&UniqueUserEvent) -> Option<bool> + Send + Sync,
{
    fn on_unique_user(&self, event: &UniqueUserEvent) -> Option<bool> {
        self(event)
    }
}

/// Runs listeners in registration order; each sees the verdict left by the
/// previous one, and the last override wins.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn UniqueUserListener>>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Arc<dyn UniqueUserListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&self, mut event: UniqueUserEvent) -> UniqueUserEvent {
        for listener in &self.listeners {
            if let Some(verdict) = listener.on_unique_user(&event) {
                if verdict != event.unique {
                    tracing::debug!(
                        "Unique check for {} overridden by listener: {} -> {}",
                        event.field,
                        event.unique,
                        verdict
                    );
                }
                event.unique = verdict;
            }
        }
        event
    }
}
