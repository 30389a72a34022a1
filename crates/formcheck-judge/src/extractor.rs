//! Field extraction from OCR text

use crate::client::ChatBackend;
use crate::prompts::{build_extraction_prompt, build_extraction_request};
use anyhow::{Context, Result};
use formcheck_core::{
    detect_text_language, Language, Record, SchemaRegistry, TextPreprocessor, ValidationSession,
};
use serde_json::Value;
use std::sync::Arc;

/// A record extracted from one document
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: Record,
    /// Language the document was filled in, and whose template was targeted
    pub language: Language,
}

/// Turns OCR text into a record shaped like the matching template
pub struct FieldExtractor<B> {
    backend: B,
    registry: Arc<SchemaRegistry>,
    preprocessor: TextPreprocessor,
}

impl<B: ChatBackend> FieldExtractor<B> {
    #[must_use]
    pub fn new(backend: B, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            backend,
            registry,
            preprocessor: TextPreprocessor::new(),
        }
    }

    /// Extract fields from `ocr_text`, detecting the fill language when
    /// `language` is `None`.
    ///
    /// # Errors
    /// Returns an error if the template for the language is unavailable, the
    /// backend call fails, or the response is not a JSON object.
    pub async fn extract(&self, ocr_text: &str, language: Option<Language>) -> Result<Extraction> {
        let text = self.preprocessor.preprocess(ocr_text);
        let language = language.unwrap_or_else(|| detect_text_language(&text));
        log::info!("Processing document in language: {language}");

        let schema = self
            .registry
            .get(language)
            .schema()
            .with_context(|| format!("No template available for {}", language.display_name()))?;

        let response = self
            .backend
            .chat_completion(
                &build_extraction_prompt(schema),
                &build_extraction_request(&text),
            )
            .await
            .context("Field extraction request failed")?;

        let value: Value = serde_json::from_str(response.trim())
            .context("Failed to parse JSON from extraction response")?;
        let record =
            Record::from_json(value).context("Extraction response is not a JSON object")?;

        log::info!("Successfully extracted {} fields", record.flatten().len());
        Ok(Extraction { record, language })
    }

    /// Extract and store the result in `session`, replacing earlier results.
    ///
    /// # Errors
    /// Same as [`FieldExtractor::extract`]; the session is left untouched on error.
    pub async fn extract_into(
        &self,
        session: &mut ValidationSession,
        ocr_text: &str,
        language: Option<Language>,
    ) -> Result<Language> {
        let extraction = self.extract(ocr_text, language).await?;
        session.set_extraction(extraction.record, extraction.language);
        Ok(extraction.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct EchoTemplate {
        system_prompts: Mutex<Vec<String>>,
        reply: Option<String>,
    }

    impl EchoTemplate {
        fn replying(reply: Option<String>) -> Self {
            Self {
                system_prompts: Mutex::new(Vec::new()),
                reply,
            }
        }
    }

    #[async_trait]
    impl ChatBackend for EchoTemplate {
        async fn chat_completion(&self, system_prompt: &str, _user_prompt: &str) -> Result<String> {
            self.system_prompts
                .lock()
                .unwrap()
                .push(system_prompt.to_string());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => bail!("service unavailable"),
            }
        }
    }

    fn extractor(reply: Option<String>) -> FieldExtractor<EchoTemplate> {
        FieldExtractor::new(
            EchoTemplate::replying(reply),
            Arc::new(SchemaRegistry::bundled()),
        )
    }

    #[tokio::test]
    async fn test_detects_hebrew_and_targets_hebrew_template() {
        let extractor = extractor(Some(json!({ "שם משפחה": "כהן" }).to_string()));

        let extraction = extractor
            .extract("--- Key-Value Pairs: ---\nשם משפחה: כהן", None)
            .await
            .unwrap();
        assert_eq!(extraction.language, Language::Hebrew);
        assert!(extraction.record.contains_key("שם משפחה"));

        let prompts = extractor.backend.system_prompts.lock().unwrap();
        assert!(prompts[0].contains("\"תאריך לידה\""));
    }

    #[tokio::test]
    async fn test_explicit_language_wins() {
        let extractor = extractor(Some("{}".to_string()));
        let extraction = extractor
            .extract("שם משפחה: כהן", Some(Language::English))
            .await
            .unwrap();
        assert_eq!(extraction.language, Language::English);
    }

    #[tokio::test]
    async fn test_non_object_reply_is_an_error() {
        let extractor = extractor(Some("[\"lastName\"]".to_string()));
        let err = extractor.extract("Smith", None).await.unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_and_keeps_session() {
        let extractor = extractor(None);
        let mut session = ValidationSession::new(Language::English);

        let err = extractor
            .extract_into(&mut session, "Smith", None)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("service unavailable"));
        assert!(session.extracted.is_none());
    }

    #[tokio::test]
    async fn test_extract_into_stores_record() {
        let extractor = extractor(Some(json!({ "lastName": "Smith" }).to_string()));
        let mut session = ValidationSession::new(Language::English);

        let language = extractor
            .extract_into(&mut session, "Last name: Smith", None)
            .await
            .unwrap();
        assert_eq!(language, Language::English);
        assert_eq!(session.extraction_language, Some(Language::English));
        assert!(session.extracted.unwrap().contains_key("lastName"));
    }
}
