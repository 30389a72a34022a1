//! formcheck CLI
//!
//! Validate extracted National Insurance form records against ground truth,
//! extract records from OCR text, and inspect the bundled templates.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use formcheck_core::{
    calculate_metrics, check_reference, detect_record_language, detect_text_language,
    parse_reference, AppConfig, Language, NoticeLevel, SchemaRegistry, ValidationMetrics,
    ValidationSession,
};
use formcheck_judge::{
    FieldExtractor, JudgeVerdict, LlmConfig, OpenAIClient, ValidationPipeline, ValidationReport,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(about = "Validation and scoring of extracted form records")]
#[command(version)]
struct Args {
    /// Directory with empty_json_{en,he}.json (overrides FORMCHECK_TEMPLATES_DIR)
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score an extracted record against a ground-truth record
    Validate {
        /// Extracted record (JSON)
        #[arg(short, long)]
        extracted: PathBuf,

        /// Ground-truth record (JSON)
        #[arg(short, long)]
        reference: PathBuf,

        /// Language the extraction ran in (default: detected from its keys)
        #[arg(long)]
        extraction_lang: Option<Language>,

        /// Language for the judge's answer (default: DEFAULT_LANGUAGE)
        #[arg(long)]
        display_lang: Option<Language>,

        /// Skip the LLM judge and print metrics only
        #[arg(long)]
        no_judge: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Extract a record from OCR text with the LLM
    Extract {
        /// OCR text as produced by the layout step
        #[arg(long)]
        ocr_text: PathBuf,

        /// Language the form was filled in (default: detected)
        #[arg(long)]
        lang: Option<Language>,

        /// Write the record here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Detect the language of OCR text or of a record's field names
    DetectLanguage {
        /// Input file
        path: PathBuf,

        /// Treat the input as a JSON record and classify its keys
        #[arg(long)]
        record: bool,
    },

    /// Print the empty template for a language
    Template {
        /// en or he
        language: Language,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env();
    if let Some(dir) = args.templates {
        config.templates_dir = Some(dir);
    }

    match args.command {
        Command::Validate {
            extracted,
            reference,
            extraction_lang,
            display_lang,
            no_judge,
            format,
        } => {
            let display_lang = display_lang.unwrap_or(config.default_language);
            validate(
                &config,
                &extracted,
                &reference,
                extraction_lang,
                display_lang,
                no_judge,
                format,
            )
            .await?;
        }
        Command::Extract {
            ocr_text,
            lang,
            output,
        } => {
            extract(&config, &ocr_text, lang, output.as_deref()).await?;
        }
        Command::DetectLanguage { path, record } => {
            detect_language(&path, record)?;
        }
        Command::Template { language } => {
            print_template(&config.schema_registry(), language)?;
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn check_supported(config: &AppConfig, language: Language) {
    if !config.is_supported(language) {
        log::warn!("Language {language} is not in SUPPORTED_LANGUAGES");
    }
}

async fn validate(
    config: &AppConfig,
    extracted_path: &Path,
    reference_path: &Path,
    extraction_lang: Option<Language>,
    display_lang: Language,
    no_judge: bool,
    format: OutputFormat,
) -> Result<()> {
    let candidate = parse_reference(&read_file(extracted_path)?)
        .with_context(|| format!("Invalid extracted record {}", extracted_path.display()))?;
    let extraction_lang = extraction_lang.unwrap_or_else(|| detect_record_language(&candidate));
    check_supported(config, extraction_lang);
    check_supported(config, display_lang);

    let reference_bytes = read_file(reference_path)?;
    let registry = Arc::new(config.schema_registry());

    if no_judge {
        let checked = check_reference(&registry, &reference_bytes, Some(extraction_lang))?;
        let metrics = calculate_metrics(&checked.record, &candidate);
        match format {
            OutputFormat::Json => {
                let report = json!({
                    "reference_language": checked.language,
                    "notice": checked.notice,
                    "metrics": metrics,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                print_intake(checked.language, checked.notice.level, &checked.notice.message);
                print_metrics(&metrics);
            }
        }
        return Ok(());
    }

    let client = OpenAIClient::new(LlmConfig::from_env())?;
    log::info!("Judging with {}", client.provider());

    let mut session = ValidationSession::new(display_lang);
    session.set_extraction(candidate, extraction_lang);

    let pipeline = ValidationPipeline::new(registry, client);
    let report = pipeline.run(&mut session, &reference_bytes).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_intake(language: Language, level: NoticeLevel, message: &str) {
    println!("Reference language: {}", language.display_name());
    match level {
        NoticeLevel::Info => println!("{message}"),
        NoticeLevel::Warning => println!("WARNING: {message}"),
    }
    println!();
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn print_metrics(metrics: &ValidationMetrics) {
    println!(
        "Overall accuracy:       {:>6.1}%  ({}/{})",
        metrics.overall_accuracy, metrics.correct_fields, metrics.total_fields
    );
    println!(
        "Language consistency:   {:>7}",
        yes_no(metrics.language_consistency)
    );
    println!("Dates accuracy:         {:>6.1}%", metrics.dates_accuracy);
    println!("Phone accuracy:         {:>6.1}%", metrics.phone_accuracy);
    println!("Checkbox accuracy:      {:>6.1}%", metrics.checkbox_accuracy);
    println!(
        "Empty fields:           {:>6.1}%",
        metrics.empty_fields_accuracy
    );
    println!(
        "Structure compliance:   {:>6.1}%",
        metrics.structure_compliance
    );
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn print_verdict(verdict: &JudgeVerdict) {
    println!();
    let rating = verdict.text_rating().map_or_else(|| "-".to_string(), capitalize);
    match verdict.numeric_score() {
        Some(score) => println!("Judge rating: {rating} ({score:.0}/100)"),
        None => println!("Judge rating: {rating}"),
    }
    for (category, analysis) in verdict.category_analysis() {
        println!("  {category}: {analysis}");
    }
    for key in [
        "language_consistency",
        "critical_mistakes",
        "system_strengths",
        "improvement_focus",
    ] {
        if let Some(text) = verdict.get(key).and_then(|v| v.as_str()) {
            println!("{key}: {text}");
        }
    }
    if let Some(summary) = verdict.summary() {
        println!("\n{summary}");
    }
}

fn print_report(report: &ValidationReport) {
    print_intake(
        report.reference_language,
        report.notice.level,
        &report.notice.message,
    );
    print_metrics(&report.metrics);
    print_verdict(&report.verdict);
}

async fn extract(
    config: &AppConfig,
    ocr_path: &Path,
    language: Option<Language>,
    output: Option<&Path>,
) -> Result<()> {
    let ocr_text = std::fs::read_to_string(ocr_path)
        .with_context(|| format!("Failed to read {}", ocr_path.display()))?;

    let client = OpenAIClient::new(LlmConfig::from_env())?;
    let extractor = FieldExtractor::new(client, Arc::new(config.schema_registry()));
    let extraction = extractor.extract(&ocr_text, language).await?;
    check_supported(config, extraction.language);

    let rendered = extraction.record.to_json_pretty();
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Extracted data saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn detect_language(path: &Path, as_record: bool) -> Result<()> {
    let language = if as_record {
        let record = parse_reference(&read_file(path)?)?;
        detect_record_language(&record)
    } else {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        detect_text_language(&text)
    };
    println!("{language} ({})", language.display_name());
    Ok(())
}

fn print_template(registry: &SchemaRegistry, language: Language) -> Result<()> {
    let Some(schema) = registry.get(language).schema() else {
        bail!("No template available for {}", language.display_name());
    };
    println!("{}", schema.to_json_pretty());
    Ok(())
}
