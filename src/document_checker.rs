use crate::analytics::{AnalyticsLog, AnalyticsSummary};
use crate::config::ScoringConfig;
use crate::models::*;
use crate::processing::extraction::is_failure_sentinel;
use crate::processing::{TextAnalyzer, TextExtractor, TypeClassifier};
use crate::utils::DocCheckError;
use crate::validation::*;
use log::{debug, info};
use std::sync::Arc;
use std::thread;

const INSUFFICIENT_TEXT_SUGGESTION: &str =
    "Very little text was extracted from the document. Please upload a clearer, higher quality image.";
const EXPIRED_SUGGESTION: &str = "Document has expired. Please renew.";
const EXPIRES_SOON_SUGGESTION: &str = "Document expires soon. Consider renewal.";
const VALID_SUGGESTION: &str = "Document appears to be valid and authentic.";
const LOW_SECURITY_SUGGESTION: &str = "Insufficient security features detected.";
const COMPLETED_SUGGESTION: &str = "Document analysis completed.";

/// Checks extracted document text end to end: classification, validation,
/// expiry and the final verdict.
pub struct DocumentChecker {
    library: PatternLibrary,
    config: ScoringConfig,
    clock: Box<dyn Clock>,
    analytics: Option<Arc<AnalyticsLog>>,
}

impl Default for DocumentChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentChecker {
    pub fn new() -> Self {
        Self::with_library(PatternLibrary::builtin(), ScoringConfig::default())
    }

    pub fn with_library(library: PatternLibrary, config: ScoringConfig) -> Self {
        DocumentChecker {
            library,
            config,
            clock: Box::new(SystemClock),
            analytics: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Record every outcome in `log`.
    pub fn with_analytics(mut self, log: Arc<AnalyticsLog>) -> Self {
        self.analytics = Some(log);
        self
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn check(&self, text: &str) -> CheckOutcome {
        let outcome = self.run(text, None);
        self.record(&outcome);
        outcome
    }

    /// Validate against a caller-chosen type instead of classifying.
    pub fn check_as(&self, text: &str, type_id: &str) -> CheckOutcome {
        let outcome = self.run(text, Some(type_id));
        self.record(&outcome);
        outcome
    }

    /// Check the result of an upstream extraction, which may have failed.
    pub fn check_extracted(&self, extracted: Result<String, DocCheckError>) -> CheckOutcome {
        let outcome = self.extracted_outcome(extracted.as_deref().map_err(|e| e.to_string()));
        self.record(&outcome);
        outcome
    }

    pub fn check_document(&self, document: &[u8], extractor: &dyn TextExtractor) -> CheckOutcome {
        debug!(
            "Extracting {} bytes with {} backend",
            document.len(),
            extractor.backend_name()
        );
        self.check_extracted(extractor.extract_text(document))
    }

    /// Check many texts in parallel. Outcomes come back in input order.
    pub fn check_batch<S>(&self, texts: &[S]) -> Vec<CheckOutcome>
    where
        S: AsRef<str> + Sync,
    {
        self.fan_out(texts, |text| self.check(text.as_ref()))
    }

    /// Like `check_batch`, for upstream extractions that may each have
    /// failed. A failed item becomes its own rejection.
    pub fn check_extracted_batch(
        &self,
        extracted: &[Result<String, DocCheckError>],
    ) -> Vec<CheckOutcome> {
        self.fan_out(extracted, |item| {
            let outcome = self.extracted_outcome(item.as_deref().map_err(|e| e.to_string()));
            self.record(&outcome);
            outcome
        })
    }

    fn fan_out<T, F>(&self, items: &[T], check: F) -> Vec<CheckOutcome>
    where
        T: Sync,
        F: Fn(&T) -> CheckOutcome + Sync,
    {
        if items.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(items.len());
        let chunk_size = items.len().div_ceil(workers);
        let check = &check;

        thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || chunk.iter().map(check).collect::<Vec<_>>()))
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Classification breakdown for every registered type.
    pub fn explain(&self, text: &str) -> Explanation {
        Explanation {
            signals: TextAnalyzer::analyze(text),
            scores: self.classifier().score_all(text),
        }
    }

    pub fn requirements(&self, type_id: &str) -> Result<Requirements, DocCheckError> {
        self.library.requirements(type_id)
    }

    pub fn statistics(&self) -> AnalyticsSummary {
        self.analytics
            .as_ref()
            .map(|log| log.summary())
            .unwrap_or_default()
    }

    fn classifier(&self) -> TypeClassifier<'_> {
        TypeClassifier::new(&self.library, self.config.min_classification_score)
    }

    fn run(&self, text: &str, forced: Option<&str>) -> CheckOutcome {
        // Step 1: Reject text too short to say anything about
        if text.trim().chars().count() < self.config.min_text_length {
            return CheckOutcome::Rejected(RejectionReport {
                kind: RejectionKind::InsufficientText,
                suggestion_text: INSUFFICIENT_TEXT_SUGGESTION.to_string(),
                extracted_text_length: text.chars().count(),
                text_sample: None,
                detail: None,
            });
        }

        // Step 2: Decide the document type
        let detected = match forced {
            Some(type_id) => match self.library.get(type_id) {
                Some(spec) => Some((spec.id.clone(), ClassificationMethod::Forced)),
                None => return self.unknown_type(text, type_id),
            },
            None => self.classifier().detect(text),
        };
        let Some((type_id, method)) = detected else {
            return self.unrecognized(text);
        };
        let Some(spec) = self.library.get(&type_id) else {
            return self.unknown_type(text, &type_id);
        };

        // Step 3: Validate and resolve expiry
        let engine = ValidationEngine::new(&self.library, &self.config);
        let mut report = engine.validate_spec(text, spec);
        report.classification = method;
        report.expiry =
            ExpiryResolver::new(self.clock.as_ref(), self.config.expiry_warning_days).resolve(text);

        // Step 4: Final verdict and suggestion
        self.finalize(&mut report);
        info!(
            "Checked {}: {} ({}%)",
            report.document_type,
            if report.valid { "valid" } else { "invalid" },
            report.confidence_percent
        );
        CheckOutcome::Validated(report)
    }

    fn extracted_outcome(&self, extracted: Result<&str, String>) -> CheckOutcome {
        match extracted {
            Ok(text) if is_failure_sentinel(text) => Self::extraction_failed(text.to_string()),
            Ok(text) => self.run(text, None),
            Err(detail) => Self::extraction_failed(detail),
        }
    }

    fn finalize(&self, report: &mut ValidationReport) {
        let passed_validation = report.valid;
        let mut suggestions = Vec::new();

        if report.expiry.expired {
            report.valid = false;
            report.issues.push(ValidationIssue::new(
                ValidationIssueType::Expiry,
                "Document has expired",
            ));
            suggestions.push(EXPIRED_SUGGESTION.to_string());
        } else if report.expiry.expires_soon {
            report.issues.push(ValidationIssue::new(
                ValidationIssueType::Expiry,
                "Document expires soon",
            ));
            suggestions.push(EXPIRES_SOON_SUGGESTION.to_string());
        } else if passed_validation {
            suggestions.push(VALID_SUGGESTION.to_string());
        }

        if !passed_validation {
            if !report.missing_fields.is_empty() {
                suggestions.push(format!(
                    "Missing required fields: {}",
                    report.missing_fields.join(", ")
                ));
            }
            if !report.security_warnings.is_empty() {
                suggestions.push(format!(
                    "Security concerns: {}",
                    report.security_warnings.join("; ")
                ));
            }
            if report.security_score < self.config.low_security_threshold {
                suggestions.push(LOW_SECURITY_SUGGESTION.to_string());
            }
        }

        report.suggestion_text = if suggestions.is_empty() {
            COMPLETED_SUGGESTION.to_string()
        } else {
            suggestions.join(" ")
        };
    }

    fn unrecognized(&self, text: &str) -> CheckOutcome {
        let supported = self
            .library
            .iter()
            .map(|spec| spec.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        debug!("Document type not recognized");

        CheckOutcome::Rejected(RejectionReport {
            kind: RejectionKind::UnrecognizedType,
            suggestion_text: format!(
                "Document type could not be identified. Supported documents: {}.",
                supported
            ),
            extracted_text_length: text.chars().count(),
            text_sample: Some(self.sample(text)),
            detail: None,
        })
    }

    fn unknown_type(&self, text: &str, type_id: &str) -> CheckOutcome {
        let detail = self
            .library
            .lookup(type_id)
            .err()
            .map(|e| e.to_string());

        CheckOutcome::Rejected(RejectionReport {
            kind: RejectionKind::UnknownTypeRequested,
            suggestion_text: format!(
                "Unknown document type '{}'. Available types: {}",
                type_id,
                self.library.ids().join(", ")
            ),
            extracted_text_length: text.chars().count(),
            text_sample: None,
            detail,
        })
    }

    fn extraction_failed(detail: String) -> CheckOutcome {
        CheckOutcome::Rejected(RejectionReport {
            kind: RejectionKind::ExtractionFailed,
            suggestion_text: format!(
                "Text extraction error: {}. Please ensure document is clear and readable.",
                detail
            ),
            extracted_text_length: 0,
            text_sample: None,
            detail: Some(detail),
        })
    }

    fn sample(&self, text: &str) -> String {
        let limit = self.config.text_sample_chars;
        if text.chars().count() > limit {
            let head: String = text.chars().take(limit).collect();
            format!("{}...", head)
        } else {
            text.to_string()
        }
    }

    fn record(&self, outcome: &CheckOutcome) {
        if let Some(log) = &self.analytics {
            log.record_outcome(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn checker_at(year: i32, month: u32, day: u32) -> DocumentChecker {
        let today = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        DocumentChecker::new().with_clock(FixedClock::at_date(today))
    }

    #[test]
    fn test_insufficient_text() {
        let outcome = DocumentChecker::new().check("   hi   ");
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.kind, RejectionKind::InsufficientText);
        assert_eq!(rejection.extracted_text_length, 8);
        assert_eq!(outcome.document_type(), "unknown");
    }

    #[test]
    fn test_exactly_minimum_length_is_not_rejected_for_length() {
        let outcome = DocumentChecker::new().check("abcdefghij");
        if let Some(rejection) = outcome.rejection() {
            assert_ne!(rejection.kind, RejectionKind::InsufficientText);
        }
    }

    #[test]
    fn test_unrecognized_includes_sample() {
        let text = "zzzz ".repeat(60);
        let outcome = DocumentChecker::new().check(&text);
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.kind, RejectionKind::UnrecognizedType);
        let sample = rejection.text_sample.as_deref().unwrap();
        assert_eq!(sample.chars().count(), 203);
        assert!(sample.ends_with("..."));
        assert!(rejection.suggestion_text.contains("Aadhaar Card"));
    }

    #[test]
    fn test_check_as_unknown_type() {
        let outcome = DocumentChecker::new().check_as("Some long enough document text", "passport");
        let rejection = outcome.rejection().unwrap();
        assert_eq!(rejection.kind, RejectionKind::UnknownTypeRequested);
        assert!(rejection.suggestion_text.contains("income_certificate"));
    }

    #[test]
    fn test_check_as_marks_forced_classification() {
        let outcome = checker_at(2024, 1, 1).check_as("Birth registration of a child", "caste_certificate");
        let report = outcome.report().unwrap();
        assert_eq!(report.document_type, "caste_certificate");
        assert_eq!(report.classification, ClassificationMethod::Forced);
    }

    #[test]
    fn test_extraction_failures() {
        let checker = DocumentChecker::new();
        let outcome = checker.check_extracted(Ok("OCR not available".to_string()));
        assert_eq!(
            outcome.rejection().map(|r| r.kind.clone()),
            Some(RejectionKind::ExtractionFailed)
        );
        assert_eq!(outcome.document_type(), "error");

        let outcome =
            checker.check_extracted(Err(DocCheckError::ExtractionFailed("corrupt PDF".to_string())));
        let rejection = outcome.rejection().unwrap();
        assert!(rejection.detail.as_deref().unwrap().contains("corrupt PDF"));
    }

    #[test]
    fn test_analytics_records_each_outcome() {
        let log = Arc::new(AnalyticsLog::new(100));
        let checker = DocumentChecker::new().with_analytics(Arc::clone(&log));
        checker.check("hi");
        checker.check_extracted(Ok("File not found".to_string()));

        let summary = checker.statistics();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 0);
        assert_eq!(summary.per_type["unknown"].total, 1);
        assert_eq!(summary.per_type["error"].total, 1);
    }

    #[test]
    fn test_explain_includes_signals() {
        let explanation = DocumentChecker::new().explain("भारत सरकार Aadhaar 1234 5678 9012");
        assert_eq!(explanation.scores.len(), 6);
        assert_eq!(explanation.signals.word_count, 6);
        assert!(explanation.signals.has_government_terms);
        assert!(explanation.signals.has_numbers);
    }

    #[test]
    fn test_statistics_without_analytics() {
        assert_eq!(DocumentChecker::new().statistics().total, 0);
    }

    #[test]
    fn test_requirements_lookup() {
        let checker = DocumentChecker::new();
        let requirements = checker.requirements("aadhaar").unwrap();
        assert_eq!(requirements.required_fields, vec!["12_digit_number", "name", "dob"]);
        assert!(checker.requirements("passport").is_err());
    }
}
