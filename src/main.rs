// Command line front end for the document validity checker

use clap::{Parser, Subcommand};
use doccheck::models::{title_case, CheckOutcome, ValidationIssueType, ValidationReport};
use doccheck::processing::{PlainTextExtractor, TextExtractor};
use doccheck::{AnalyticsLog, DocCheckError, DocumentChecker, PatternLibrary, ScoringConfig};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "doccheck",
    version,
    about = "Checks extracted text of Indian government documents for validity"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scoring configuration (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom document type library (JSON) replacing the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    library: Option<PathBuf>,

    /// Append every verdict to this JSON-lines history file
    #[arg(long, global = true, value_name = "FILE")]
    analytics: Option<PathBuf>,

    /// Print machine-readable JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one extracted-text file
    Check {
        file: PathBuf,

        /// Validate against this document type instead of detecting it
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        doc_type: Option<String>,
    },
    /// Check several files in parallel
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show the classification score breakdown for every document type
    Explain { file: PathBuf },
    /// Show what a document type requires
    Requirements { doc_type: String },
    /// List supported document types
    Types,
    /// Summarize the verdict history given with --analytics
    Stats,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DocCheckError> {
    let checker = build_checker(&cli)?;

    match &cli.command {
        Commands::Check { file, doc_type } => {
            let outcome = match doc_type {
                Some(doc_type) => checker.check_as(&read_text(file)?, doc_type),
                None => checker.check_document(&fs::read(file)?, &PlainTextExtractor),
            };
            if cli.json {
                print_json(&outcome)?;
            } else {
                print_outcome(&outcome, file, checker.config().low_security_threshold);
            }
        }
        Commands::Batch { files } => {
            // Unreadable files become their own rejections.
            let extracted: Vec<_> = files.iter().map(|file| read_text(file)).collect();
            let outcomes = checker.check_extracted_batch(&extracted);
            if cli.json {
                print_json(&outcomes)?;
            } else {
                print_batch(files, &outcomes);
            }
        }
        Commands::Explain { file } => {
            let text = read_text(file)?;
            let explanation = checker.explain(&text);
            if cli.json {
                print_json(&explanation)?;
            } else {
                let signals = &explanation.signals;
                println!("CLASSIFICATION BREAKDOWN: {}", file.display());
                println!(
                    "  Text: {} characters, {} words, script {}",
                    signals.text_length,
                    signals.word_count,
                    signals.dominant_script.as_deref().unwrap_or("unknown")
                );
                println!(
                    "  Signals: numbers {}, dates {}, government terms {}, Devanagari {}",
                    signals.has_numbers,
                    signals.has_dates,
                    signals.has_government_terms,
                    signals.has_devanagari
                );
                for score in &explanation.scores {
                    println!(
                        "  {:<22} total {:>5.1}  keywords {:>2}  patterns {:>2}  context {:>2}  structure {:>2}",
                        score.document_type,
                        score.total(),
                        score.keyword_score,
                        score.pattern_score,
                        score.context_score,
                        score.structure_score
                    );
                    if !score.matched_keywords.is_empty() {
                        println!("      matched: {}", score.matched_keywords.join(", "));
                    }
                }
            }
        }
        Commands::Requirements { doc_type } => {
            let requirements = checker.requirements(doc_type)?;
            if cli.json {
                print_json(&requirements)?;
            } else {
                println!("REQUIREMENTS FOR {}", title_case(doc_type).to_uppercase());
                println!("\nRequired Fields:");
                for field in &requirements.required_fields {
                    println!("  - {}", title_case(field));
                }
                println!("\nSecurity Features:");
                for feature in &requirements.security_features {
                    println!("  - {}", feature);
                }
                println!("\nKeywords to Look For:");
                for keyword in &requirements.keywords {
                    println!("  - {}", keyword);
                }
            }
        }
        Commands::Types => {
            if cli.json {
                print_json(&checker.library().ids())?;
            } else {
                for spec in checker.library().iter() {
                    println!("  {:<22} {}", spec.id, spec.display_name);
                }
            }
        }
        Commands::Stats => {
            if cli.analytics.is_none() {
                return Err(DocCheckError::InvalidArgument(
                    "stats needs a history file given with --analytics".to_string(),
                ));
            }
            let summary = checker.statistics();
            if cli.json {
                print_json(&summary)?;
            } else if summary.total == 0 {
                println!("No validation history available.");
            } else {
                println!("DOCUMENT VALIDATION STATISTICS");
                println!("  Total Documents Processed: {}", summary.total);
                println!("  Valid Documents: {}", summary.valid);
                println!("  Invalid Documents: {}", summary.invalid);
                println!("  Success Rate: {}%", summary.success_rate);
                println!("  Average Confidence: {}%", summary.average_confidence);
                println!("  Average Security Score: {}%", summary.average_security_score);
                println!("\nDocument Type Breakdown:");
                for (doc_type, breakdown) in &summary.per_type {
                    println!(
                        "  - {}: {}/{} ({:.1}%)",
                        title_case(doc_type),
                        breakdown.valid,
                        breakdown.total,
                        breakdown.success_rate()
                    );
                }
            }
        }
    }

    Ok(())
}

fn build_checker(cli: &Cli) -> Result<DocumentChecker, DocCheckError> {
    let config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let library = match &cli.library {
        Some(path) => PatternLibrary::load(path)?,
        None => PatternLibrary::builtin(),
    };

    let capacity = config.analytics_capacity;
    let mut checker = DocumentChecker::with_library(library, config);
    if let Some(path) = &cli.analytics {
        let log = AnalyticsLog::with_persistence(path, capacity)?;
        checker = checker.with_analytics(Arc::new(log));
    }
    Ok(checker)
}

fn read_text(path: &Path) -> Result<String, DocCheckError> {
    PlainTextExtractor.extract_text(&fs::read(path)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), DocCheckError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_outcome(outcome: &CheckOutcome, file: &Path, low_security_threshold: f64) {
    match outcome {
        CheckOutcome::Validated(report) => {
            print_detailed_report(report, file, low_security_threshold)
        }
        CheckOutcome::Rejected(rejection) => {
            println!("\n===============================================");
            println!("      DOCUMENT CHECK: NOT VALIDATED");
            println!("===============================================\n");
            println!("  File: {}", file.display());
            println!("  Outcome: {:?}", rejection.kind);
            println!("  Extracted text length: {}", rejection.extracted_text_length);
            if let Some(detail) = &rejection.detail {
                println!("  Detail: {}", detail);
            }
            if let Some(sample) = &rejection.text_sample {
                println!("  Text sample: {}", sample);
            }
            println!("\n{}", rejection.suggestion_text);
        }
    }
}

fn passed(ok: bool) -> &'static str {
    if ok {
        "PASSED"
    } else {
        "FAILED"
    }
}

// Function to print a detailed validation report
fn print_detailed_report(report: &ValidationReport, file: &Path, low_security_threshold: f64) {
    println!("\n===============================================");
    println!("      DOCUMENT VALIDITY DETAILED REPORT");
    println!("===============================================\n");

    println!("DOCUMENT INFORMATION:");
    println!("  File: {}", file.display());
    println!("  Document Type: {}", title_case(&report.document_type));
    println!("  Classification: {:?}", report.classification);
    println!("  Confidence Score: {}%", report.confidence_percent);
    println!("  Security Score: {}%", report.security_percent());
    println!("  Field Detection: {:.1}%", report.avg_field_confidence);
    println!(
        "  Text: {} characters, {} words, script {}",
        report.text_signals.text_length,
        report.text_signals.word_count,
        report.text_signals.dominant_script.as_deref().unwrap_or("unknown")
    );

    println!("\nVALIDATION STEPS:");
    println!(
        "  1. Required Fields: {} ({}/{})",
        passed(report.missing_fields.is_empty()),
        report.found_fields.len(),
        report.found_fields.len() + report.missing_fields.len()
    );
    println!(
        "  2. Security Features: {}",
        passed(
            report.security_warnings.is_empty()
                && report.security_score >= low_security_threshold
        )
    );
    println!("  3. Integrity: {}", passed(report.integrity.red_flags.is_empty()));
    println!("  4. Expiry: {}", passed(!report.expiry.expired));

    if report.expiry.has_expiry {
        if let Some(date) = &report.expiry.expiry_date_raw {
            println!("\nEXPIRY DATE: {}", date);
        }
    }

    if !report.extracted_data.is_empty() {
        println!("\nEXTRACTED INFORMATION:");
        for (field, value) in &report.extracted_data {
            println!("  {}: {}", title_case(field), value.trim());
        }
    }

    if !report.field_confidence.is_empty() {
        println!("\nFIELD CONFIDENCE:");
        for (field, confidence) in &report.field_confidence {
            println!("  {}: {}%", title_case(field), confidence);
        }
    }

    if !report.integrity.authenticity_markers.is_empty() {
        println!("\nAUTHENTICITY MARKERS:");
        for marker in &report.integrity.authenticity_markers {
            println!("  - {}", marker);
        }
    }

    if !report.issues.is_empty() {
        println!("\nISSUES FOUND:");
        for issue in &report.issues {
            println!(
                "  - [{}] {}",
                match issue.issue_type {
                    ValidationIssueType::Field => "FIELD",
                    ValidationIssueType::Security => "SECURITY",
                    ValidationIssueType::Integrity => "INTEGRITY",
                    ValidationIssueType::Expiry => "EXPIRY",
                    ValidationIssueType::Classification => "CLASSIFICATION",
                },
                issue.message
            );
        }
    }

    println!("\n{}", report.suggestion_text);
    println!(
        "Document validity result: {}",
        if report.valid { "VALID" } else { "INVALID" }
    );
    println!("\nNote: This is automated analysis. For official verification, contact the issuing authority.");
}

fn print_batch(files: &[PathBuf], outcomes: &[CheckOutcome]) {
    println!("BATCH DOCUMENT ANALYSIS RESULTS\n");
    for (index, (file, outcome)) in files.iter().zip(outcomes).enumerate() {
        println!(
            "  Document {} ({}): {} - {} ({}% confidence)",
            index + 1,
            file.display(),
            title_case(outcome.document_type()),
            if outcome.is_valid() { "Valid" } else { "Invalid" },
            outcome.confidence_percent()
        );
    }
    println!("\nSummary: Processed {} documents", outcomes.len());
}
