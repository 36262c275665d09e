use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationIssueType {
    Field,
    Security,
    Integrity,
    Expiry,
    Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub issue_type: ValidationIssueType,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(issue_type: ValidationIssueType, message: impl Into<String>) -> Self {
        ValidationIssue {
            issue_type,
            message: message.into(),
        }
    }
}

/// Cheap structural signals computed from raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextSignals {
    pub has_numbers: bool,
    pub has_dates: bool,
    pub has_government_terms: bool,
    pub has_devanagari: bool,
    /// Length in characters, not bytes.
    pub text_length: usize,
    pub word_count: usize,
    /// Dominant writing system as reported by whatlang, if any.
    pub dominant_script: Option<String>,
}

/// Per-type breakdown produced by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationScore {
    pub document_type: String,
    pub keyword_score: u32,
    pub pattern_score: u32,
    pub context_score: u32,
    pub structure_score: u32,
    pub matched_keywords: Vec<String>,
}

impl ClassificationScore {
    pub fn total(&self) -> f64 {
        f64::from(self.keyword_score) * 0.4
            + f64::from(self.pattern_score) * 0.3
            + f64::from(self.context_score) * 0.2
            + f64::from(self.structure_score) * 0.1
    }
}

/// How the document type of a report was decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ClassificationMethod {
    Primary { score: f64 },
    Fallback,
    Forced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldResult {
    pub found: bool,
    /// 0 to 100.
    pub confidence: u32,
    pub extracted_value: Option<String>,
}

impl FieldResult {
    pub fn missing() -> Self {
        FieldResult {
            found: false,
            confidence: 0,
            extracted_value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegrityResult {
    /// Four 20-point checks, so at most 80.
    pub text_quality: u32,
    /// 0 to 35. Not normalized; it is summed with `text_quality` in the composite.
    pub structure_score: u32,
    pub authenticity_markers: Vec<String>,
    pub red_flags: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecurityResult {
    pub security_score: f64,
    pub found_features: Vec<String>,
    pub warnings: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpiryResult {
    pub has_expiry: bool,
    pub expired: bool,
    pub expires_soon: bool,
    pub expiry_date_raw: Option<String>,
    pub days_until_expiry: Option<i64>,
}

/// Result of validating text against one document type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub document_type: String,
    pub valid: bool,
    /// Composite score in [0, 1].
    pub validity_score: f64,
    pub found_fields: Vec<String>,
    pub missing_fields: Vec<String>,
    pub field_confidence: BTreeMap<String, u32>,
    pub extracted_data: BTreeMap<String, String>,
    pub field_ratio: f64,
    pub avg_field_confidence: f64,
    pub security_score: f64,
    pub security_warnings: Vec<String>,
    pub found_security_features: Vec<String>,
    pub integrity: IntegrityResult,
    pub expiry: ExpiryResult,
    pub text_signals: TextSignals,
    /// `validity_score * 100` rounded to one decimal.
    pub confidence_percent: f64,
    pub suggestion_text: String,
    pub classification: ClassificationMethod,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn security_percent(&self) -> f64 {
        round1(self.security_score * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InsufficientText,
    UnrecognizedType,
    UnknownTypeRequested,
    ExtractionFailed,
}

/// A check that ended before validation could run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionReport {
    pub kind: RejectionKind,
    pub suggestion_text: String,
    pub extracted_text_length: usize,
    pub text_sample: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Validated(ValidationReport),
    Rejected(RejectionReport),
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        match self {
            CheckOutcome::Validated(report) => report.valid,
            CheckOutcome::Rejected(_) => false,
        }
    }

    /// Type id of a validated document, "error" for failed extraction and
    /// "unknown" for any other rejection.
    pub fn document_type(&self) -> &str {
        match self {
            CheckOutcome::Validated(report) => &report.document_type,
            CheckOutcome::Rejected(rejection) => match rejection.kind {
                RejectionKind::ExtractionFailed => "error",
                _ => "unknown",
            },
        }
    }

    pub fn confidence_percent(&self) -> f64 {
        match self {
            CheckOutcome::Validated(report) => report.confidence_percent,
            CheckOutcome::Rejected(_) => 0.0,
        }
    }

    pub fn security_percent(&self) -> f64 {
        match self {
            CheckOutcome::Validated(report) => report.security_percent(),
            CheckOutcome::Rejected(_) => 0.0,
        }
    }

    pub fn suggestion_text(&self) -> &str {
        match self {
            CheckOutcome::Validated(report) => &report.suggestion_text,
            CheckOutcome::Rejected(rejection) => &rejection.suggestion_text,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CheckOutcome::Validated(report) => Some(report),
            CheckOutcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&RejectionReport> {
        match self {
            CheckOutcome::Validated(_) => None,
            CheckOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Classification breakdown for every type, with the signals it was based on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub signals: TextSignals,
    pub scores: Vec<ClassificationScore>,
}

/// Static lookup of what a document type expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirements {
    pub document_type: String,
    pub required_fields: Vec<String>,
    pub security_features: Vec<String>,
    pub keywords: Vec<String>,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_total_weights() {
        let score = ClassificationScore {
            document_type: "income_certificate".to_string(),
            keyword_score: 10,
            pattern_score: 10,
            context_score: 10,
            structure_score: 10,
            matched_keywords: vec![],
        };
        assert!((score.total() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejected_outcome_accessors() {
        let outcome = CheckOutcome::Rejected(RejectionReport {
            kind: RejectionKind::ExtractionFailed,
            suggestion_text: "retry".to_string(),
            extracted_text_length: 0,
            text_sample: None,
            detail: Some("OCR not available".to_string()),
        });
        assert!(!outcome.is_valid());
        assert_eq!(outcome.document_type(), "error");
        assert_eq!(outcome.confidence_percent(), 0.0);
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(92.54), 92.5);
        assert_eq!(round1(66.66666), 66.7);
    }
}
