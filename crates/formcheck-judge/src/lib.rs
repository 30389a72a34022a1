//! LLM extraction and LLM-as-judge evaluation for form records
//!
//! Wraps the scoring in `formcheck-core` with the two model calls around it:
//! extracting a record from OCR text, and asking a judge model for a written
//! verdict on an extraction.
//!
//! # Features
//!
//! - **Chat backends**: `OpenAI` or Azure `OpenAI`, selected from the environment
//! - **Graceful judging**: a failed judge call yields a renderable error verdict
//! - **Pipeline**: intake gate, metrics and judge over an explicit session
//!
//! # Example
//!
//! ```no_run
//! use formcheck_core::{Language, SchemaRegistry, ValidationSession};
//! use formcheck_judge::{FieldExtractor, LlmConfig, OpenAIClient, ValidationPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new(LlmConfig::from_env())?;
//!     let registry = Arc::new(SchemaRegistry::bundled());
//!
//!     let mut session = ValidationSession::new(Language::English);
//!     let ocr_text = std::fs::read_to_string("form_283.txt")?;
//!     FieldExtractor::new(client.clone(), Arc::clone(&registry))
//!         .extract_into(&mut session, &ocr_text, None)
//!         .await?;
//!
//!     let reference = std::fs::read("form_283_truth.json")?;
//!     let report = ValidationPipeline::new(registry, client)
//!         .run(&mut session, &reference)
//!         .await?;
//!
//!     println!("Overall accuracy: {:.1}%", report.metrics.overall_accuracy);
//!     println!("Judge: {}", report.verdict.text_rating().unwrap_or("-"));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod extractor;
pub mod judge;
pub mod pipeline;
pub mod prompts;
pub mod verdict;

pub use client::{ChatBackend, OpenAIClient, Provider};
pub use config::LlmConfig;
pub use extractor::{Extraction, FieldExtractor};
pub use judge::ValidationJudge;
pub use pipeline::{ValidationPipeline, ValidationReport};
pub use verdict::JudgeVerdict;
