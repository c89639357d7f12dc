//! # Error Types
//!
//! The typed error taxonomy shared across components. Transport adapters
//! translate these into their own protocol's error representation.

use crate::entities::NotificationId;
use thiserror::Error;

/// Errors surfaced by the store adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store is not connected or stopped responding.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The underlying store call failed.
    #[error("store operation failed: {0}")]
    Backend(String),
}

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The named group does not exist.
    #[error("group not found: {group_name}")]
    GroupNotFound { group_name: String },

    /// No notification matches the given id.
    #[error("notification not found: {id}")]
    NotificationNotFound { id: NotificationId },

    /// A group with this name already exists.
    #[error("group already exists: {group_name}")]
    GroupAlreadyExists { group_name: String },

    /// An underlying store call failed.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Malformed TTL or empty required field.
    #[error("validation error: {0}")]
    Validation(String),
}

impl EngineError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts_into_engine_error() {
        let err: EngineError = StoreError::Unavailable("not connected".into()).into();
        assert!(matches!(err, EngineError::Storage(_)));
    }

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = EngineError::GroupNotFound {
            group_name: "team".into(),
        };
        assert_eq!(err.to_string(), "group not found: team");
    }
}
