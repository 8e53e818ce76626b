//! Validation errors.

use crate::FieldType;
use std::fmt;
use thiserror::Error;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A payload or filter does not satisfy a table's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{table}` payload: field `{field}` {reason}")]
pub struct ValidationError {
    pub table: String,
    /// The offending field. `"$"` when the payload itself is malformed.
    pub field: String,
    pub reason: ValidationReason,
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// The field is not declared by the schema.
    UnknownField,
    /// A required field is absent.
    MissingField,
    /// A required field is null.
    NullNotAllowed,
    /// The value has the wrong primitive type.
    WrongType { expected: FieldType },
    /// The payload is not a JSON object.
    NotAnObject,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField => write!(f, "is not declared"),
            Self::MissingField => write!(f, "is required"),
            Self::NullNotAllowed => write!(f, "must not be null"),
            Self::WrongType { expected } => write!(f, "must be {expected}"),
            Self::NotAnObject => write!(f, "must be an object"),
        }
    }
}

impl ValidationError {
    pub(crate) fn new(table: &str, field: &str, reason: ValidationReason) -> Self {
        Self {
            table: table.to_string(),
            field: field.to_string(),
            reason,
        }
    }
}
