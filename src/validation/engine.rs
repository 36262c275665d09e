use crate::config::ScoringConfig;
use crate::models::{
    round1, ClassificationMethod, DocumentTypeSpec, ExpiryResult, IntegrityResult,
    PatternLibrary, TextSignals, ValidationIssue, ValidationIssueType, ValidationReport,
};
use crate::processing::{extract_identity_details, FieldExtractor, TextAnalyzer};
use crate::validation::{IntegrityAssessor, SecurityAssessor};
use std::collections::BTreeMap;

pub const UNKNOWN_TYPE_FIELD: &str = "Unknown document type";

/// Runs the field, security and integrity checks for one document type and
/// combines them into a validity score.
pub struct ValidationEngine<'a> {
    library: &'a PatternLibrary,
    config: &'a ScoringConfig,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(library: &'a PatternLibrary, config: &'a ScoringConfig) -> Self {
        ValidationEngine { library, config }
    }

    pub fn validate(&self, text: &str, type_id: &str) -> ValidationReport {
        match self.library.get(type_id) {
            Some(spec) => self.validate_spec(text, spec),
            None => Self::unknown_type_report(type_id),
        }
    }

    pub fn validate_spec(&self, text: &str, spec: &DocumentTypeSpec) -> ValidationReport {
        // Step 1: Extract required fields
        let fields = FieldExtractor::new(self.config).extract(text, spec);

        let mut found_fields = Vec::new();
        let mut missing_fields = Vec::new();
        let mut field_confidence = BTreeMap::new();
        let mut extracted_data = BTreeMap::new();
        let mut issues = Vec::new();
        for field in &spec.required_fields {
            let Some(result) = fields.get(field) else {
                continue;
            };
            if result.found {
                found_fields.push(field.clone());
            } else {
                missing_fields.push(field.clone());
                issues.push(ValidationIssue::new(
                    ValidationIssueType::Field,
                    format!("Missing required field: {}", field),
                ));
            }
            field_confidence.insert(field.clone(), result.confidence);
            if let Some(value) = &result.extracted_value {
                extracted_data.insert(field.clone(), value.clone());
            }
        }
        if spec.identity_number_field.is_some() {
            extracted_data.extend(extract_identity_details(text));
        }

        // Step 2: Integrity and security checks
        let integrity = IntegrityAssessor::assess(text);
        let security = SecurityAssessor::assess(text, spec);
        issues.extend(security.issues.clone());
        issues.extend(integrity.issues.clone());

        // Step 3: Composite score
        let field_ratio = if spec.required_fields.is_empty() {
            0.0
        } else {
            found_fields.len() as f64 / spec.required_fields.len() as f64
        };
        let avg_field_confidence = if field_confidence.is_empty() {
            0.0
        } else {
            field_confidence.values().map(|c| f64::from(*c)).sum::<f64>()
                / field_confidence.len() as f64
        };
        let validity_score = self.composite_score(
            field_ratio,
            avg_field_confidence,
            security.security_score,
            &integrity,
        );
        let valid = self.decide(validity_score, integrity.red_flags.len());

        ValidationReport {
            document_type: spec.id.clone(),
            valid,
            validity_score,
            found_fields,
            missing_fields,
            field_confidence,
            extracted_data,
            field_ratio,
            avg_field_confidence,
            security_score: security.security_score,
            security_warnings: security.warnings,
            found_security_features: security.found_features,
            integrity,
            expiry: ExpiryResult::default(),
            text_signals: TextAnalyzer::analyze(text),
            confidence_percent: round1(validity_score * 100.0),
            suggestion_text: String::new(),
            classification: ClassificationMethod::Forced,
            issues,
        }
    }

    /// Weighted combination of the individual checks, less the red flag
    /// penalty, clamped to [0, 1].
    pub fn composite_score(
        &self,
        field_ratio: f64,
        avg_field_confidence: f64,
        security_score: f64,
        integrity: &IntegrityResult,
    ) -> f64 {
        let integrity_score =
            f64::from(integrity.text_quality + integrity.structure_score) / 100.0;
        let score = field_ratio * 0.3
            + (avg_field_confidence / 100.0) * 0.25
            + security_score * 0.25
            + integrity_score * 0.2;
        let penalty = integrity.red_flags.len() as f64 * self.config.red_flag_penalty;
        (score - penalty).clamp(0.0, 1.0)
    }

    /// Any red flag fails the document whatever its score.
    pub fn decide(&self, validity_score: f64, red_flags: usize) -> bool {
        validity_score >= self.config.validity_threshold && red_flags == 0
    }

    fn unknown_type_report(type_id: &str) -> ValidationReport {
        ValidationReport {
            document_type: type_id.to_string(),
            valid: false,
            validity_score: 0.0,
            found_fields: Vec::new(),
            missing_fields: vec![UNKNOWN_TYPE_FIELD.to_string()],
            field_confidence: BTreeMap::new(),
            extracted_data: BTreeMap::new(),
            field_ratio: 0.0,
            avg_field_confidence: 0.0,
            security_score: 0.0,
            security_warnings: vec![UNKNOWN_TYPE_FIELD.to_string()],
            found_security_features: Vec::new(),
            integrity: IntegrityResult::default(),
            expiry: ExpiryResult::default(),
            text_signals: TextSignals::default(),
            confidence_percent: 0.0,
            suggestion_text: format!("{}: {}", UNKNOWN_TYPE_FIELD, type_id),
            classification: ClassificationMethod::Forced,
            issues: vec![ValidationIssue::new(
                ValidationIssueType::Classification,
                format!("{}: {}", UNKNOWN_TYPE_FIELD, type_id),
            )],
        }
    }
}
