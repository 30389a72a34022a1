//! The judge's structured verdict

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Text rating used by degraded verdicts.
pub const ERROR_RATING: &str = "error";

/// Verdict returned by the judge model
///
/// The model decides the exact contents; the only guarantee is that this is a
/// JSON object. Accessors read the well-known keys and return `None` when the
/// model left them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeVerdict(Map<String, Value>);

impl JudgeVerdict {
    /// Parse the raw model response.
    ///
    /// # Errors
    /// Returns an error if the response is not JSON or not a JSON object.
    pub fn from_response(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text.trim()).context("Judge response is not valid JSON")?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => bail!("Judge response is not a JSON object: {other}"),
        }
    }

    /// Renderable verdict standing in for a failed judge call.
    #[must_use]
    pub fn degraded(detail: &str) -> Self {
        let mut map = Map::new();
        map.insert(
            "overall_score".to_string(),
            json!({ "text_rating": ERROR_RATING, "numeric_score": 0 }),
        );
        map.insert(
            "summary".to_string(),
            Value::String(format!("Error in LLM evaluation: {detail}")),
        );
        Self(map)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn text_rating(&self) -> Option<&str> {
        self.0.get("overall_score")?.get("text_rating")?.as_str()
    }

    #[must_use]
    pub fn numeric_score(&self) -> Option<f64> {
        self.0.get("overall_score")?.get("numeric_score")?.as_f64()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.0.get("summary")?.as_str()
    }

    /// Per-category prose, keyed by category name, in response order.
    pub fn category_analysis(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .get("category_analysis")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
            .filter_map(|(key, value)| Some((key.as_str(), value.as_str()?)))
    }

    #[inline]
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.text_rating() == Some(ERROR_RATING)
    }

    #[must_use]
    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}
