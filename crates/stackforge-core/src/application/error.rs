//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::application::services::RunState;
use crate::error::ErrorCategory;

/// Errors that occur while loading documents or driving a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A required document is missing or could not be read.
    #[error("Configuration '{id}' not found: {reason}")]
    ConfigurationNotFound { id: String, reason: String },

    /// A required document exists but is not a valid mapping document.
    #[error("Configuration '{id}' could not be parsed: {reason}")]
    ConfigurationParse { id: String, reason: String },

    /// A run operation was called in the wrong state.
    #[error("Cannot {operation} while the run is {actual}; expected {expected}")]
    OutOfSequence {
        operation: &'static str,
        expected: RunState,
        actual: RunState,
    },
}

impl ApplicationError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ConfigurationNotFound {
            id: id.into(),
            reason: "no document with this id".into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigurationNotFound { id, .. } => vec![
                format!("Create {id}.yml (or .yaml, .json, .toml) in the configuration directory"),
                "Point --dir (or STACKFORGE_DIR) at the directory holding your documents".into(),
            ],
            Self::ConfigurationParse { id, .. } => vec![
                format!("Fix the syntax of '{id}'"),
                "The document root must be a mapping of keys to values".into(),
            ],
            Self::OutOfSequence { .. } => vec![
                "Runs go: apply configuration, set models, resolve, build manifest".into(),
                "Start a new run instead of reusing a finished one".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigurationParse { .. } => ErrorCategory::Configuration,
            Self::OutOfSequence { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_points_at_the_document_directory_flag() {
        let suggestions = ApplicationError::not_found("app").suggestions();
        assert!(suggestions[0].contains("app.yml"));
        assert!(suggestions.iter().any(|s| s.contains("--dir")));
        assert!(!suggestions.iter().any(|s| s.contains("--config-dir")));
    }

    #[test]
    fn categories() {
        assert_eq!(
            ApplicationError::not_found("app").category(),
            ErrorCategory::NotFound
        );
        let parse = ApplicationError::ConfigurationParse {
            id: "app".into(),
            reason: "bad".into(),
        };
        assert_eq!(parse.category(), ErrorCategory::Configuration);
    }
}
