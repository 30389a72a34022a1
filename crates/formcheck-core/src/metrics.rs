//! Accuracy metrics between a reference record and a candidate record.
//!
//! All comparisons are exact string equality after trimming both sides; no
//! case folding, no normalization. A path missing from the candidate is
//! compared as an empty string.

// Field counts are tiny; the usize -> f64 casts are exact.
#![allow(clippy::cast_precision_loss)]

use crate::language::detect_record_language;
use crate::record::{FlatValue, FlatView, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field categories scored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    Dates,
    Phones,
    Checkboxes,
}

impl FieldCategory {
    pub const ALL: [Self; 3] = [Self::Dates, Self::Phones, Self::Checkboxes];

    /// Bilingual field-name keywords. A flattened path belongs to the category
    /// when it contains any keyword as a plain substring, so nested date parts
    /// such as `dateOfBirth.day` count as dates.
    #[must_use]
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Dates => &[
                "dateOfBirth",
                "dateOfInjury",
                "formFillingDate",
                "formReceiptDateAtClinic",
                "תאריך לידה",
                "תאריך הפגיעה",
                "תאריך מילוי הטופס",
                "תאריך קבלת הטופס בקופה",
            ],
            Self::Phones => &["landlinePhone", "mobilePhone", "טלפון קווי", "טלפון נייד"],
            Self::Checkboxes => &[
                "gender",
                "accidentLocation",
                "healthFundMember",
                "מין",
                "מקום התאונה",
                "חבר בקופת חולים",
            ],
        }
    }

    #[must_use]
    pub fn matches(self, path: &str) -> bool {
        self.keywords().iter().any(|keyword| path.contains(keyword))
    }
}

impl std::fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dates => write!(f, "dates"),
            Self::Phones => write!(f, "phones"),
            Self::Checkboxes => write!(f, "checkboxes"),
        }
    }
}

/// Result of comparing a candidate record against a reference record.
///
/// Percentages are on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub overall_accuracy: f64,
    pub language_consistency: bool,
    pub dates_accuracy: f64,
    pub phone_accuracy: f64,
    pub checkbox_accuracy: f64,
    pub empty_fields_accuracy: f64,
    pub structure_compliance: f64,
    pub total_fields: usize,
    pub correct_fields: usize,
}

impl ValidationMetrics {
    /// Accuracy for one category.
    #[must_use]
    pub const fn category_accuracy(&self, category: FieldCategory) -> f64 {
        match category {
            FieldCategory::Dates => self.dates_accuracy,
            FieldCategory::Phones => self.phone_accuracy,
            FieldCategory::Checkboxes => self.checkbox_accuracy,
        }
    }
}

/// Compute all metrics for `candidate` against ground-truth `reference`.
#[must_use]
pub fn calculate_metrics(reference: &Record, candidate: &Record) -> ValidationMetrics {
    let language_consistency =
        detect_record_language(reference) == detect_record_language(candidate);

    let expected = reference.flatten();
    let extracted = candidate.flatten();

    let total_fields = expected.len();
    let correct_fields = expected
        .iter()
        .filter(|(path, value)| values_match(value, extracted.get(path)))
        .count();
    let overall_accuracy = percentage(correct_fields, total_fields, 0.0);

    let metrics = ValidationMetrics {
        overall_accuracy,
        language_consistency,
        dates_accuracy: category_accuracy(&expected, &extracted, FieldCategory::Dates),
        phone_accuracy: category_accuracy(&expected, &extracted, FieldCategory::Phones),
        checkbox_accuracy: category_accuracy(&expected, &extracted, FieldCategory::Checkboxes),
        empty_fields_accuracy: empty_fields_accuracy(&expected, &extracted),
        structure_compliance: structure_compliance(reference, candidate),
        total_fields,
        correct_fields,
    };

    log::info!(
        "Computed metrics: {correct_fields}/{total_fields} fields correct ({:.1}%), structure {:.1}%",
        metrics.overall_accuracy,
        metrics.structure_compliance
    );
    metrics
}

/// Trimmed exact equality; an absent candidate value reads as `""`.
fn values_match(expected: &FlatValue, extracted: Option<&FlatValue>) -> bool {
    let extracted = extracted.map_or("", FlatValue::as_str);
    expected.as_str().trim() == extracted.trim()
}

fn percentage(part: usize, whole: usize, if_empty: f64) -> f64 {
    if whole == 0 {
        if_empty
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Accuracy restricted to one category; 100 when the reference has no
/// field in the category.
#[must_use]
pub fn category_accuracy(expected: &FlatView, extracted: &FlatView, category: FieldCategory) -> f64 {
    let (total, correct) = expected
        .iter()
        .filter(|(path, _)| category.matches(path))
        .fold((0, 0), |(total, correct), (path, value)| {
            let hit = values_match(value, extracted.get(path));
            (total + 1, correct + usize::from(hit))
        });
    percentage(correct, total, 100.0)
}

/// Share of empty reference fields the candidate also left empty; 100 when
/// the reference has no empty field.
#[must_use]
pub fn empty_fields_accuracy(expected: &FlatView, extracted: &FlatView) -> f64 {
    let (total, correct) = expected
        .iter()
        .filter(|(_, value)| value.is_empty())
        .fold((0, 0), |(total, correct), (path, _)| {
            let hit = extracted.get(path).map_or(true, FlatValue::is_empty);
            (total + 1, correct + usize::from(hit))
        });
    percentage(correct, total, 100.0)
}

/// Path-set compliance over leaves and sections.
///
/// `max(0, matched - min(extra, |E|)) / |E| * 100`, so extra paths cost as
/// much as missing ones but can never push the score below zero. A reference
/// with no paths scores 100.
#[must_use]
pub fn structure_compliance(reference: &Record, candidate: &Record) -> f64 {
    let expected: HashSet<String> = reference.all_paths().into_iter().collect();
    let extracted: HashSet<String> = candidate.all_paths().into_iter().collect();

    if expected.is_empty() {
        return 100.0;
    }

    let matched = expected.intersection(&extracted).count();
    let extra = extracted.difference(&expected).count();
    let penalty = extra.min(expected.len());
    let effective = matched.saturating_sub(penalty);

    effective as f64 / expected.len() as f64 * 100.0
}
