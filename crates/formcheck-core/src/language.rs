//! Language tags and the two language heuristics.
//!
//! The free-text heuristic runs on OCR output before extraction and decides
//! which language the form was *filled in*. The record heuristic runs on a
//! structured record and decides which *key set* it uses. The two never share
//! logic: a Hebrew-keyed record may well hold English values.

use crate::record::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Supported form languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "he")]
    Hebrew,
}

impl Language {
    /// All languages with a bundled template.
    pub const ALL: [Self; 2] = [Self::English, Self::Hebrew];

    /// Short tag used in file names and configuration (`en` / `he`).
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hebrew => "he",
        }
    }

    /// Human-readable name in the language itself.
    #[inline]
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hebrew => "עברית",
        }
    }
}

impl std::fmt::Display for Language {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "he" | "hebrew" => Ok(Self::Hebrew),
            _ => Err(format!("unknown language: '{s}' (expected: en, he)")),
        }
    }
}

/// Scaffolding words our own OCR text layout inserts (section headers and
/// checkbox state markers). Matched case-sensitively.
const OCR_SCAFFOLDING_WORDS: [&str; 7] = [
    "Key",
    "Value",
    "Pairs",
    "selected",
    "unselected",
    "Raw",
    "Lines",
];

/// Canonical top-level keys of the Hebrew template.
const HEBREW_MARKER_KEYS: [&str; 4] = ["שם משפחה", "שם פרטי", "מספר זהות", "מין"];

/// Canonical top-level keys of the English template.
const ENGLISH_MARKER_KEYS: [&str; 4] = ["firstName", "lastName", "idNumber", "gender"];

// Whole words made only of Latin letters; \b is Unicode-aware, so a Latin
// run glued to digits or Hebrew letters is not a word.
static LATIN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{2,}\b").expect("Invalid Latin word regex"));

/// Count Latin words of length >= 2 that are not OCR scaffolding.
#[must_use]
pub fn meaningful_latin_words(text: &str) -> usize {
    LATIN_WORD
        .find_iter(text)
        .filter(|m| !OCR_SCAFFOLDING_WORDS.contains(&m.as_str()))
        .count()
}

/// Count characters in the Hebrew Unicode block (U+0590..=U+05FF).
#[must_use]
pub fn hebrew_char_count(text: &str) -> usize {
    text.chars()
        .filter(|c| ('\u{0590}'..='\u{05FF}').contains(c))
        .count()
}

/// Decide which language a form was filled in, from its OCR text.
///
/// Any meaningful Latin word means English: a form completed in English still
/// carries Hebrew static labels, while a Hebrew-filled form rarely carries
/// Latin words. With neither signal the result is English.
#[must_use]
pub fn detect_text_language(text: &str) -> Language {
    let latin = meaningful_latin_words(text);
    if latin > 0 {
        log::debug!("Detected English from {latin} meaningful Latin words");
        return Language::English;
    }
    let hebrew = hebrew_char_count(text);
    if hebrew > 0 {
        log::debug!("Detected Hebrew from {hebrew} Hebrew characters");
        Language::Hebrew
    } else {
        log::debug!("No language signal in OCR text, defaulting to English");
        Language::English
    }
}

/// Decide which template key set a record uses, from its top-level keys.
///
/// Hebrew needs a strict majority of marker-key matches; ties go to English.
#[must_use]
pub fn detect_record_language(record: &Record) -> Language {
    let hebrew = HEBREW_MARKER_KEYS
        .iter()
        .filter(|key| record.contains_key(key))
        .count();
    let english = ENGLISH_MARKER_KEYS
        .iter()
        .filter(|key| record.contains_key(key))
        .count();

    if hebrew > english {
        Language::Hebrew
    } else {
        Language::English
    }
}
