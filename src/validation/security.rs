use crate::models::{DocumentTypeSpec, SecurityResult, ValidationIssue, ValidationIssueType};

/// Phrases suggesting the text came from something other than an original.
/// "duplicate" appears twice and each occurrence counts.
pub const FRAUD_INDICATORS: &[&str] = &[
    "photocopy",
    "xerox",
    "duplicate",
    "sample",
    "specimen",
    "draft",
    "watermark missing",
    "poor quality",
    "blurred text",
    "copy",
    "duplicate",
    "not original",
    "scanned copy",
    "printout",
];

/// Indicators present in already-lowercased text, in list order.
pub fn matched_fraud_indicators(lower: &str) -> Vec<&'static str> {
    FRAUD_INDICATORS
        .iter()
        .copied()
        .filter(|indicator| lower.contains(indicator))
        .collect()
}

pub struct SecurityAssessor;

impl SecurityAssessor {
    pub fn assess(text: &str, spec: &DocumentTypeSpec) -> SecurityResult {
        let lower = text.to_lowercase();
        let mut issues = Vec::new();

        let mut found_features = Vec::new();
        for feature in &spec.security_features {
            if lower.contains(&feature.to_lowercase()) {
                found_features.push(feature.clone());
            } else {
                issues.push(ValidationIssue::new(
                    ValidationIssueType::Security,
                    format!("Security feature not mentioned: {}", feature),
                ));
            }
        }

        let warnings: Vec<String> = matched_fraud_indicators(&lower)
            .into_iter()
            .map(|indicator| format!("Potential fraud indicator: {}", indicator))
            .collect();
        for warning in &warnings {
            issues.push(ValidationIssue::new(ValidationIssueType::Security, warning.clone()));
        }

        let security_score = if spec.security_features.is_empty() {
            1.0
        } else {
            found_features.len() as f64 / spec.security_features.len() as f64
        };

        SecurityResult {
            security_score,
            found_features,
            warnings,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternLibrary;

    #[test]
    fn test_security_ratio() {
        let library = PatternLibrary::builtin();
        let spec = library.get("income_certificate").unwrap();
        let result = SecurityAssessor::assess("Government Seal and REVENUE STAMP", spec);
        assert!((result.security_score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.found_features, vec!["government seal", "revenue stamp"]);
        assert!(result.warnings.is_empty());
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn test_no_expected_features_scores_one() {
        let json = r#"[{"id": "permit", "keywords": ["permit"], "required_fields": ["a"]}]"#;
        let library = PatternLibrary::from_json_str(json).unwrap();
        let result = SecurityAssessor::assess("anything", library.get("permit").unwrap());
        assert_eq!(result.security_score, 1.0);
    }

    #[test]
    fn test_duplicate_indicator_reported_twice() {
        let library = PatternLibrary::builtin();
        let spec = library.get("aadhaar").unwrap();
        let result = SecurityAssessor::assess("DUPLICATE", spec);
        assert_eq!(
            result.warnings,
            vec![
                "Potential fraud indicator: duplicate",
                "Potential fraud indicator: duplicate",
            ]
        );
    }

    #[test]
    fn test_scanned_copy_also_matches_copy() {
        assert_eq!(
            matched_fraud_indicators("scanned copy attached"),
            vec!["copy", "scanned copy"]
        );
    }
}
