//! Reference intake and the per-user validation context.
//!
//! A [`ValidationSession`] holds what one user has produced so far (the
//! extracted record, its language, the latest results). It is owned by the
//! caller and passed into each stage explicitly; nothing here is global.

use crate::error::{FormCheckError, Result};
use crate::language::{detect_record_language, Language};
use crate::metrics::ValidationMetrics;
use crate::record::Record;
use crate::schema::SchemaRegistry;
use crate::validator::validate_structure;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a message shown alongside a successful intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// Non-fatal message produced while accepting a reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A reference record that passed intake.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedReference {
    pub record: Record,
    pub language: Language,
    pub notice: Notice,
}

/// Decode uploaded bytes into a record: UTF-8, then JSON, then an object.
///
/// # Errors
/// [`FormCheckError::InvalidUtf8`], [`FormCheckError::InvalidJson`] or
/// [`FormCheckError::NotAnObject`].
pub fn parse_reference(bytes: &[u8]) -> Result<Record> {
    let text = std::str::from_utf8(bytes)?;
    let value: Value = serde_json::from_str(text)?;
    let kind = json_kind(&value);
    Record::from_json(value).ok_or(FormCheckError::NotAnObject(kind))
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse, classify and structurally validate an uploaded reference record.
///
/// The template is chosen by the reference's own key language. When
/// `extraction_language` is known and differs, the record is still accepted
/// and a warning notice is attached.
///
/// # Errors
/// Malformed input, a missing template for the detected language, or the
/// first structural violation.
pub fn check_reference(
    registry: &SchemaRegistry,
    bytes: &[u8],
    extraction_language: Option<Language>,
) -> Result<CheckedReference> {
    let record = parse_reference(bytes)?;
    let language = detect_record_language(&record);
    log::debug!("Reference record uses {language} field names");

    let template = registry.get(language);
    if !template.is_available() {
        return Err(FormCheckError::SchemaUnavailable(language));
    }
    validate_structure(&record, template)?;

    let notice = match extraction_language {
        Some(expected) if expected != language => {
            log::warn!("Language mismatch: extraction is {expected}, ground truth is {language}");
            Notice {
                level: NoticeLevel::Warning,
                message: format!(
                    "Language mismatch: the extracted data is in {} but the ground truth file is in {}",
                    expected.display_name(),
                    language.display_name()
                ),
            }
        }
        _ => Notice {
            level: NoticeLevel::Info,
            message: "Valid JSON structure".to_string(),
        },
    };

    Ok(CheckedReference {
        record,
        language,
        notice,
    })
}

/// Explicit per-user context threaded through the pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    /// Record produced by the extraction step, if any.
    pub extracted: Option<Record>,
    /// Language the extraction ran in.
    pub extraction_language: Option<Language>,
    /// Language the judge should answer in.
    pub display_language: Language,
    /// Metrics of the most recent successful run.
    pub last_metrics: Option<ValidationMetrics>,
    /// Judge verdict of the most recent successful run, as JSON.
    pub last_verdict: Option<Value>,
}

impl ValidationSession {
    #[must_use]
    pub fn new(display_language: Language) -> Self {
        Self {
            display_language,
            ..Self::default()
        }
    }

    /// Store a fresh extraction and drop results computed for the previous one.
    pub fn set_extraction(&mut self, record: Record, language: Language) {
        self.extracted = Some(record);
        self.extraction_language = Some(language);
        self.last_metrics = None;
        self.last_verdict = None;
    }

    /// Store the results of a completed run.
    pub fn record_results(&mut self, metrics: ValidationMetrics, verdict: Value) {
        self.last_metrics = Some(metrics);
        self.last_verdict = Some(verdict);
    }
}
