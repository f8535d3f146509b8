// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (warnings and errors are collected and replayed in reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: String },

    #[error("Invalid dependency: {0}")]
    InvalidGem(String),

    #[error("Invalid entity '{entity}': {reason}")]
    InvalidEntity { entity: String, reason: String },

    #[error("Unknown attribute type '{type_name}'")]
    UnknownAttributeType { type_name: String },

    #[error("Unknown association kind '{kind}'")]
    UnknownAssociationKind { kind: String },

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid configuration representation: {0}")]
    InvalidRepresentation(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Entity '{name}' is declared more than once")]
    DuplicateEntity { name: String },

    #[error("Duplicate path in manifest: {path}")]
    DuplicatePath { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Add `{field}` to the base configuration document"),
                "Every document needs `provider`, `framework` and `environment`".into(),
            ],
            Self::UnknownAttributeType { type_name } => vec![
                format!("'{type_name}' is not a supported attribute type"),
                "Supported: string, text, integer, float, decimal, boolean, date, datetime"
                    .into(),
            ],
            Self::UnknownAssociationKind { kind } => vec![
                format!("'{kind}' is not a supported association"),
                "Supported: has_one, has_many, belongs_to, has_and_belongs_to_many".into(),
            ],
            Self::DuplicateEntity { name } => vec![
                format!("Model '{name}' appears twice"),
                "Merge the two declarations or rename one of them".into(),
            ],
            Self::InvalidGem(_) => vec!["Every dependency needs a non-empty `name`".into()],
            Self::InvalidField { field, .. } => {
                vec![format!("Check the type of `{field}` in the configuration document")]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. }
            | Self::InvalidGem(_)
            | Self::InvalidEntity { .. }
            | Self::UnknownAttributeType { .. }
            | Self::UnknownAssociationKind { .. }
            | Self::InvalidField { .. }
            | Self::InvalidRepresentation(_) => ErrorCategory::Validation,
            Self::DuplicateEntity { .. } => ErrorCategory::Conflict,
            Self::DuplicatePath { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Internal,
}
