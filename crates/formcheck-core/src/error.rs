//! Error types for reference intake and structural validation.

use crate::language::Language;
use thiserror::Error;

/// First structural problem found while checking a record against a template.
///
/// The `Display` text names the offending dotted path and is what gets shown
/// to the person who uploaded the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureViolation {
    /// A field required by the template is absent from the record.
    #[error("Missing required field: {path}")]
    MissingField { path: String },

    /// The template holds a section here but the record does not.
    #[error("Field {path} should be an object/dictionary")]
    ExpectedSection { path: String },

    /// The template holds a string leaf here but the record does not.
    #[error("Field {path} should be a string")]
    ExpectedString { path: String },

    /// The record carries a field the template does not know about.
    #[error("Unexpected field found: {path} (not in template schema)")]
    UnexpectedField { path: String },

    /// No template is loaded, so no structural check can be performed.
    #[error("No template schema available for validation")]
    SchemaUnavailable,
}

impl StructureViolation {
    /// Dotted path of the offending field, if the violation names one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path }
            | Self::ExpectedSection { path }
            | Self::ExpectedString { path }
            | Self::UnexpectedField { path } => Some(path),
            Self::SchemaUnavailable => None,
        }
    }
}

/// Errors that halt a validation run before any metric is computed.
#[derive(Error, Debug)]
pub enum FormCheckError {
    /// Uploaded reference bytes are not UTF-8 text.
    #[error("Reference file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Uploaded reference text is not valid JSON.
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Uploaded reference JSON is valid but not an object.
    #[error("JSON must be an object at the top level, found {0}")]
    NotAnObject(&'static str),

    /// The template for the detected language could not be loaded.
    #[error("No template available for language '{0}'")]
    SchemaUnavailable(Language),

    /// The reference does not match the template's shape.
    #[error("Structure validation failed: {0}")]
    Structure(#[from] StructureViolation),

    /// Validation was requested before any record was extracted.
    #[error("No extracted data found; process a document first")]
    NoExtraction,

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for formcheck operations.
pub type Result<T> = std::result::Result<T, FormCheckError>;
