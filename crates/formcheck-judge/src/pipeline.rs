//! End-to-end validation of a session's extraction against a reference

use crate::client::ChatBackend;
use crate::judge::ValidationJudge;
use crate::verdict::JudgeVerdict;
use formcheck_core::{
    calculate_metrics, check_reference, FormCheckError, Language, Notice, Result, SchemaRegistry,
    ValidationMetrics, ValidationSession,
};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of one validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Language of the reference record's field names
    pub reference_language: Language,
    pub notice: Notice,
    pub metrics: ValidationMetrics,
    pub verdict: JudgeVerdict,
}

/// Intake gate, metrics and judge, in that order
pub struct ValidationPipeline<B> {
    registry: Arc<SchemaRegistry>,
    judge: ValidationJudge<B>,
}

impl<B: ChatBackend> ValidationPipeline<B> {
    #[must_use]
    pub const fn new(registry: Arc<SchemaRegistry>, backend: B) -> Self {
        Self {
            registry,
            judge: ValidationJudge::new(backend),
        }
    }

    #[inline]
    #[must_use]
    pub const fn judge(&self) -> &ValidationJudge<B> {
        &self.judge
    }

    /// Validate the session's extracted record against `reference_bytes`.
    ///
    /// Results are stored back in `session`. A failing judge does not fail
    /// the run; its verdict is degraded instead.
    ///
    /// # Errors
    /// [`FormCheckError::NoExtraction`] when the session has no record yet,
    /// or any intake error from [`check_reference`]. The session keeps its
    /// previous results on error.
    pub async fn run(
        &self,
        session: &mut ValidationSession,
        reference_bytes: &[u8],
    ) -> Result<ValidationReport> {
        let candidate = session
            .extracted
            .as_ref()
            .ok_or(FormCheckError::NoExtraction)?;

        let checked = check_reference(&self.registry, reference_bytes, session.extraction_language)?;
        let metrics = calculate_metrics(&checked.record, candidate);
        let verdict = self
            .judge
            .evaluate(&checked.record, candidate, &metrics, session.display_language)
            .await;

        session.record_results(metrics.clone(), verdict.clone().into_json());

        Ok(ValidationReport {
            reference_language: checked.language,
            notice: checked.notice,
            metrics,
            verdict,
        })
    }
}
