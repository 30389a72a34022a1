//! Validation and scoring of machine-extracted form records
//!
//! Compares a record extracted from a scanned National Insurance form
//! (OCR + LLM extraction) against a human-provided ground-truth record, in
//! either the English or the Hebrew field layout.
//!
//! # Features
//!
//! - **Schema templates**: two fixed bilingual templates, loaded once
//! - **Language detection**: from OCR text (form language) or from a record's keys
//! - **Structural validation**: strict two-way shape check with the first offending path
//! - **Metrics**: overall, per-category, empty-field and structure-compliance scores
//!
//! # Example
//!
//! ```
//! use formcheck_core::{calculate_metrics, parse_reference};
//!
//! let reference = parse_reference(br#"{"firstName": "John", "lastName": "Smith"}"#)?;
//! let candidate = parse_reference(br#"{"firstName": "John", "lastName": "smith"}"#)?;
//!
//! let metrics = calculate_metrics(&reference, &candidate);
//! assert_eq!(metrics.overall_accuracy, 50.0);
//! assert_eq!(metrics.structure_compliance, 100.0);
//! # Ok::<(), formcheck_core::FormCheckError>(())
//! ```

pub mod config;
pub mod error;
pub mod language;
pub mod metrics;
pub mod ocr;
pub mod record;
pub mod schema;
pub mod session;
pub mod validator;

pub use config::AppConfig;
pub use error::{FormCheckError, Result, StructureViolation};
pub use language::{detect_record_language, detect_text_language, Language};
pub use metrics::{calculate_metrics, FieldCategory, ValidationMetrics};
pub use ocr::{KeyValuePair, OcrLayout, TextPreprocessor};
pub use record::{FlatValue, FlatView, Record, RecordNode};
pub use schema::{Schema, SchemaNode, SchemaRegistry, SchemaTemplate};
pub use session::{
    check_reference, parse_reference, CheckedReference, Notice, NoticeLevel, ValidationSession,
};
pub use validator::validate_structure;
