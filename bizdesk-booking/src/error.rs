use std::fmt;

use bizdesk_core::errors::DeskError;
use bizdesk_schema::SchemaErrors;
use serde_json::json;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Time of day outside the window, not a quantized minute, or in the past.
    InvalidTime,
    InvalidDuration,
    /// A form section still has field errors.
    IncompleteSection,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::InvalidTime => "invalid_time",
            ValidationKind::InvalidDuration => "invalid_duration",
            ValidationKind::IncompleteSection => "incomplete_section",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local, recoverable form error. `errors` holds the offending fields.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
    pub errors: SchemaErrors,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, message: impl Into<String>, errors: SchemaErrors) -> Self {
        Self {
            kind,
            message: message.into(),
            errors,
        }
    }

    /// Single-field error.
    pub fn field(kind: ValidationKind, field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = SchemaErrors::new();
        errors.push_field(field, message.clone());
        Self::new(kind, message, errors)
    }
}

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        err.errors
            .into_unprocessable(err.message)
            .with_data(json!({ "reason": err.kind.as_str() }))
    }
}
