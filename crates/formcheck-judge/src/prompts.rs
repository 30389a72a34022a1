//! Prompt text for the judge and the field extractor

use formcheck_core::{Language, Record, Schema, ValidationMetrics};
use std::fmt::Write;

/// System prompt for the qualitative judge: response shape and rating bands.
pub const JUDGE_SYSTEM_PROMPT: &str = r#"You are an expert evaluator for a document field extraction system. Your task is to analyze the performance of an AI system that extracts data from Israeli National Insurance Institute forms.

You will receive:
1. EXPECTED_JSON: The correct ground truth data
2. EXTRACTED_JSON: The AI system's output
3. CALCULATED_METRICS: Pre-calculated accuracy metrics

EVALUATION TASK:
Provide a comprehensive but concise evaluation of the system's performance.

RESPONSE FORMAT (JSON):
{
  "overall_score": {
    "text_rating": "excellent/very good/good/medium/bad/very bad",
    "numeric_score": 85
  },
  "category_analysis": {
    "overall_accuracy": "1-3 sentences analysis",
    "dates_accuracy": "1-3 sentences analysis",
    "phone_accuracy": "1-3 sentences analysis",
    "checkbox_accuracy": "1-3 sentences analysis",
    "empty_fields": "1-3 sentences analysis"
  },
  "language_consistency": "1-2 sentences about language matching",
  "critical_mistakes": "2-3 main issues the system struggles with",
  "system_strengths": "2-3 things the system does well",
  "improvement_focus": "1-2 key areas to focus on for better performance",
  "summary": "2-3 sentences overall assessment"
}

EVALUATION CRITERIA:
- Overall accuracy above 90%: excellent
- 80-90%: very good
- 70-80%: good
- 60-70%: medium
- 50-60%: bad
- Below 50%: very bad

Consider:
- How well did it extract names, addresses, dates correctly?
- Did it maintain language consistency (Hebrew vs English)?
- Did it correctly identify selected checkboxes?
- Did it format phone numbers properly?
- Did it handle empty fields appropriately?

Be constructive and specific in your feedback. Focus on actionable insights."#;

/// Instruction that pins the judge's answer language.
#[must_use]
pub const fn response_language_instruction(language: Language) -> &'static str {
    match language {
        Language::Hebrew => "Please respond in Hebrew.",
        Language::English => "Please respond in English.",
    }
}

/// Build the judge's user prompt from both records and the computed metrics.
#[must_use]
pub fn build_judge_prompt(
    reference: &Record,
    candidate: &Record,
    metrics: &ValidationMetrics,
    display_language: Language,
) -> String {
    let mut prompt = String::with_capacity(4096);

    // write! into a String cannot fail
    let _ = writeln!(prompt, "EXPECTED_JSON:\n{}\n", reference.to_json_pretty());
    let _ = writeln!(prompt, "EXTRACTED_JSON:\n{}\n", candidate.to_json_pretty());

    prompt.push_str("CALCULATED_METRICS:\n");
    let _ = writeln!(
        prompt,
        "- Overall Accuracy: {:.1}%",
        metrics.overall_accuracy
    );
    let _ = writeln!(
        prompt,
        "- Language Consistency: {}",
        if metrics.language_consistency { "Yes" } else { "No" }
    );
    let _ = writeln!(prompt, "- Dates Accuracy: {:.1}%", metrics.dates_accuracy);
    let _ = writeln!(
        prompt,
        "- Phone Numbers Accuracy: {:.1}%",
        metrics.phone_accuracy
    );
    let _ = writeln!(
        prompt,
        "- Checkbox Selection Accuracy: {:.1}%",
        metrics.checkbox_accuracy
    );
    let _ = writeln!(
        prompt,
        "- Empty Fields Recognition: {:.1}%",
        metrics.empty_fields_accuracy
    );
    let _ = writeln!(
        prompt,
        "- Structure Compliance: {:.1}%",
        metrics.structure_compliance
    );
    let _ = writeln!(
        prompt,
        "- Correct Fields: {}/{}\n",
        metrics.correct_fields, metrics.total_fields
    );

    prompt.push_str(response_language_instruction(display_language));
    prompt.push_str("\nPlease provide your evaluation in the specified JSON format.\n");
    prompt
}

/// Build the extraction system prompt around the target template.
#[must_use]
pub fn build_extraction_prompt(schema: &Schema) -> String {
    format!(
        r#"You are an AI assistant specialized in extracting data from Israeli National Insurance Institute (ביטוח לאומי) forms.

Your task is to analyze OCR text content and extract specific fields into a structured JSON format.

IMPORTANT INSTRUCTIONS:
1. The input text comes from OCR, so there may be some OCR errors or inaccuracies
2. Return ONLY valid JSON - no additional text, explanations, or formatting
3. Use the EXACT field names as shown in the expected JSON structure below
4. If a field is not found or cannot be extracted, use an empty string ""

VALIDATION RULES:
5. Phone number formatting:
   - mobilePhone - טלפון נייד: If 10 digits and doesn't start with "0", replace the first digit with "0". Must start with "0", usually "05"
   - landlinePhone - טלפון קווי: If 9 digits and doesn't start with "0", replace the first digit with "0". Must start with "0"
6. ID number: If longer than 9 digits, keep only the first 9 digits. Must be exactly 9 digits or an empty string
7. Dates should be in DD, MM, YYYY format with leading zeros
8. Text formatting: For any English text in the final JSON, ensure sentences start with a capital letter

LOGICAL VALIDATION:
9. Make sure extracted values make sense for their field type:
   - Address fields (accidentAddress - כתובת מקום התאונה, street - רחוב): Should contain actual addresses
   - Name fields (firstName, lastName): Should contain actual names, not addresses or descriptions
   - Phone fields: Should contain only digits in the correct phone format
   - Date fields: Should contain actual dates, not text descriptions
   - Gender field: Should be "Male"/"Female" or "זכר"/"נקבה", or an empty string
   - ID numbers: Should be numeric, exactly 9 digits
   - Job types: Should describe actual occupations
   - Body parts: Should be actual body part names (arm, leg, back, etc.)
   - Time fields: Should be in HH:MM format

INPUT STRUCTURE:
The input has two sections:
- "Key-Value Pairs": Fields detected by the OCR layout model
- "Raw Lines": All extracted text lines (backup in case key-value pairs missed something)

EXPECTED JSON OUTPUT STRUCTURE:
{schema}

Extract the information carefully and return only the JSON object."#,
        schema = schema.to_json_pretty()
    )
}

/// User prompt wrapping the OCR text for extraction.
#[must_use]
pub fn build_extraction_request(ocr_text: &str) -> String {
    format!("Extract the form fields from this OCR content:\n\n{ocr_text}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcheck_core::{calculate_metrics, SchemaRegistry};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn test_judge_prompt_contains_records_and_metrics() {
        let reference = record(json!({ "שם פרטי": "דנה", "mobilePhone": "0501234567" }));
        let candidate = record(json!({ "שם פרטי": "דנה", "mobilePhone": "501234567" }));
        let metrics = calculate_metrics(&reference, &candidate);

        let prompt = build_judge_prompt(&reference, &candidate, &metrics, Language::Hebrew);

        assert!(prompt.starts_with("EXPECTED_JSON:\n{"));
        assert!(prompt.contains("\"שם פרטי\": \"דנה\""));
        assert!(prompt.contains("\"mobilePhone\": \"501234567\""));
        assert!(prompt.contains("- Overall Accuracy: 50.0%"));
        assert!(prompt.contains("- Phone Numbers Accuracy: 0.0%"));
        assert!(prompt.contains("- Language Consistency: Yes"));
        assert!(prompt.contains("- Correct Fields: 1/2"));
        assert!(prompt.contains("Please respond in Hebrew."));
        assert!(!prompt.contains("Please respond in English."));
    }

    #[test]
    fn test_judge_prompt_rounds_to_one_decimal() {
        let reference = record(json!({ "a": "1", "b": "2", "c": "3" }));
        let candidate = record(json!({ "a": "1", "b": "x", "c": "y" }));
        let metrics = calculate_metrics(&reference, &candidate);

        let prompt = build_judge_prompt(&reference, &candidate, &metrics, Language::English);
        assert!(prompt.contains("- Overall Accuracy: 33.3%"));
        assert!(prompt.contains("Please respond in English."));
    }

    #[test]
    fn test_system_prompt_fixes_rating_bands() {
        assert!(JUDGE_SYSTEM_PROMPT.contains("\"numeric_score\""));
        assert!(JUDGE_SYSTEM_PROMPT.contains("Below 50%: very bad"));
        assert!(JUDGE_SYSTEM_PROMPT.contains("\"improvement_focus\""));
    }

    #[test]
    fn test_extraction_prompt_embeds_template() {
        let registry = SchemaRegistry::bundled();
        let schema = registry.get(Language::Hebrew).schema().unwrap();

        let prompt = build_extraction_prompt(schema);
        assert!(prompt.contains("\"שם משפחה\": \"\""));
        assert!(prompt.contains("HH:MM"));
        assert!(prompt.ends_with("return only the JSON object."));
    }

    #[test]
    fn test_extraction_request() {
        assert_eq!(
            build_extraction_request("--- Raw Lines: ---"),
            "Extract the form fields from this OCR content:\n\n--- Raw Lines: ---"
        );
    }
}
