//! Qualitative evaluation by an LLM judge

use crate::client::ChatBackend;
use crate::prompts::{build_judge_prompt, JUDGE_SYSTEM_PROMPT};
use crate::verdict::JudgeVerdict;
use formcheck_core::{Language, Record, ValidationMetrics};

/// Sends records and computed metrics to a chat backend for a written verdict
pub struct ValidationJudge<B> {
    backend: B,
}

impl<B: ChatBackend> ValidationJudge<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the judge for a verdict, answered in `display_language`.
    ///
    /// Never fails: a backend error or an unparsable response is logged and
    /// returned as [`JudgeVerdict::degraded`].
    pub async fn evaluate(
        &self,
        reference: &Record,
        candidate: &Record,
        metrics: &ValidationMetrics,
        display_language: Language,
    ) -> JudgeVerdict {
        let prompt = build_judge_prompt(reference, candidate, metrics, display_language);

        let result = self
            .backend
            .chat_completion(JUDGE_SYSTEM_PROMPT, &prompt)
            .await
            .and_then(|response| JudgeVerdict::from_response(&response));

        match result {
            Ok(verdict) => {
                log::info!(
                    "Judge verdict: {} ({})",
                    verdict.text_rating().unwrap_or("unrated"),
                    verdict
                        .numeric_score()
                        .map_or_else(|| "no score".to_string(), |s| format!("{s:.0}"))
                );
                verdict
            }
            Err(e) => {
                log::error!("Error getting LLM evaluation: {e:#}");
                JudgeVerdict::degraded(&format!("{e:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use formcheck_core::calculate_metrics;
    use serde_json::json;
    use std::sync::Mutex;

    struct Scripted {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(reply: std::result::Result<&str, &str>) -> Self {
            Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for Scripted {
        async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            self.reply.clone().map_err(|e| anyhow!(e))
        }
    }

    fn records() -> (Record, Record) {
        (
            Record::from_json(json!({ "firstName": "John" })).unwrap(),
            Record::from_json(json!({ "firstName": "Jon" })).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_evaluate_returns_parsed_verdict() {
        let (reference, candidate) = records();
        let metrics = calculate_metrics(&reference, &candidate);
        let judge = ValidationJudge::new(Scripted::new(Ok(
            r#"{"overall_score": {"text_rating": "very bad", "numeric_score": 10}}"#,
        )));

        let verdict = judge
            .evaluate(&reference, &candidate, &metrics, Language::English)
            .await;
        assert_eq!(verdict.text_rating(), Some("very bad"));

        let seen = judge.backend().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, JUDGE_SYSTEM_PROMPT);
        assert!(seen[0].1.contains("\"firstName\": \"Jon\""));
    }

    #[tokio::test]
    async fn test_backend_failure_degrades() {
        let (reference, candidate) = records();
        let metrics = calculate_metrics(&reference, &candidate);
        let judge = ValidationJudge::new(Scripted::new(Err("rate limited")));

        let verdict = judge
            .evaluate(&reference, &candidate, &metrics, Language::Hebrew)
            .await;
        assert!(verdict.is_degraded());
        assert_eq!(verdict.numeric_score(), Some(0.0));
        assert_eq!(verdict.summary(), Some("Error in LLM evaluation: rate limited"));
    }

    #[tokio::test]
    async fn test_malformed_response_degrades() {
        let (reference, candidate) = records();
        let metrics = calculate_metrics(&reference, &candidate);
        let judge = ValidationJudge::new(Scripted::new(Ok("not json at all")));

        let verdict = judge
            .evaluate(&reference, &candidate, &metrics, Language::English)
            .await;
        assert!(verdict.is_degraded());
        assert!(verdict
            .summary()
            .unwrap()
            .starts_with("Error in LLM evaluation: Judge response is not valid JSON"));
    }
}
