//! Error types for persona loading, composition requests, and store access.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PersonaError>;

/// Errors surfaced to callers of the persona service.
///
/// Composition and prompt assembly never produce these; only the repository
/// boundary, row normalization, request validation, and construction do.
#[derive(Error, Debug)]
pub enum PersonaError {
    /// Persona or enhancement id absent in the store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A source row lacks a required key.
    #[error("Missing required field '{field}' in {record} row")]
    MissingField { record: &'static str, field: String },

    /// A source row carries a value of the wrong shape.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Transport or connection failure talking to the store.
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    /// Invalid constructor arguments or configuration.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A creation request failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersonaError {
    pub(crate) fn missing(record: &'static str, field: &str) -> Self {
        PersonaError::MissingField {
            record,
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PersonaError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the missing key when this is a `MissingField` error.
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            PersonaError::MissingField { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for PersonaError {
    fn from(err: config::ConfigError) -> Self {
        PersonaError::ConfigurationError(err.to_string())
    }
}
