//! OCR text layout and cleanup applied before field extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Header of the key-value section in the extractor's input text.
pub const KEY_VALUE_HEADER: &str = "--- Key-Value Pairs: ---";

/// Header of the raw-lines section in the extractor's input text.
pub const RAW_LINES_HEADER: &str = "--- Raw Lines: ---";

/// Key-value pair detected by the OCR service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub value: Option<String>,
}

/// The parts of an OCR result the extractor consumes.
///
/// Key-value pairs come from the service's form analysis; lines are the raw
/// text lines of the first page, kept as a fallback for pairs it missed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrLayout {
    pub key_value_pairs: Vec<KeyValuePair>,
    pub lines: Vec<String>,
}

impl OcrLayout {
    /// Render the two-section text blob handed to the extraction model.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut kv_section = vec![KEY_VALUE_HEADER.to_string()];
        if self.key_value_pairs.is_empty() {
            kv_section.push("No key-value pairs detected.".to_string());
        } else {
            kv_section.extend(self.key_value_pairs.iter().map(|pair| {
                let value = pair.value.as_deref().map_or("", str::trim);
                format!("{}: {value}", pair.key.trim())
            }));
        }

        let mut line_section = vec![RAW_LINES_HEADER.to_string()];
        if self.lines.is_empty() {
            line_section.push("No lines detected.".to_string());
        } else {
            line_section.extend(self.lines.iter().map(|line| line.trim().to_string()));
        }

        format!("{}\n\n{}", kv_section.join("\n"), line_section.join("\n"))
            .trim()
            .to_string()
    }
}

/// OCR correction rules: (pattern, replacement).
///
/// The signature box's checkmark is often read as a Latin X glued to the
/// Hebrew "signature" label.
const CORRECTION_RULES: [(&str, &str); 4] = [
    (r"חתימהX", "חתימה"),
    (r"Xחתימה", "חתימה"),
    (r"חתימהx", "חתימה"),
    (r"xחתימה", "חתימה"),
];

static COMPILED_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CORRECTION_RULES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("Invalid OCR correction regex"),
                *replacement,
            )
        })
        .collect()
});

/// Applies fixed OCR correction rules before text reaches the extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Apply every correction rule in order.
    #[must_use]
    pub fn preprocess(&self, text: &str) -> String {
        let processed = COMPILED_RULES
            .iter()
            .fold(text.to_string(), |acc, (pattern, replacement)| {
                pattern.replace_all(&acc, *replacement).into_owned()
            });
        log::info!("Applied {} preprocessing rules", COMPILED_RULES.len());
        processed
    }
}
