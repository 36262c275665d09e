use crate::models::{IntegrityResult, ValidationIssue, ValidationIssueType};
use crate::processing::text_analysis::DATE_PATTERN;
use crate::validation::security::matched_fraud_indicators;
use lazy_static::lazy_static;
use regex::Regex;

const AUTHENTICITY_MARKERS: &[&str] = &[
    "government",
    "सरकार",
    "authority",
    "प्राधिकरण",
    "official",
    "seal",
    "signature",
];

lazy_static! {
    static ref ALPHA_RUN: Regex = Regex::new(r"[A-Za-z]{3,}").unwrap();
    static ref SPECIAL_CHAR: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref DIGIT: Regex = Regex::new(r"\d").unwrap();
    static ref UPPERCASE_RUN: Regex = Regex::new(r"[A-Z]{2,}").unwrap();
}

/// Type-independent checks on text quality and structure.
pub struct IntegrityAssessor;

impl IntegrityAssessor {
    pub fn assess(text: &str) -> IntegrityResult {
        let length = text.chars().count();

        let mut text_quality = 0;
        if length > 100 {
            text_quality += 20;
        }
        if length > 300 {
            text_quality += 20;
        }
        if ALPHA_RUN.is_match(text) {
            text_quality += 20;
        }
        if !SPECIAL_CHAR.is_match(text) {
            text_quality += 20;
        }

        let mut structure_score = 0;
        if DIGIT.is_match(text) {
            structure_score += 10;
        }
        if UPPERCASE_RUN.is_match(text) {
            structure_score += 10;
        }
        if DATE_PATTERN.is_match(text) {
            structure_score += 15;
        }

        let lower = text.to_lowercase();
        let authenticity_markers = AUTHENTICITY_MARKERS
            .iter()
            .filter(|marker| lower.contains(*marker))
            .map(|marker| marker.to_string())
            .collect();

        let red_flags: Vec<String> = matched_fraud_indicators(&lower)
            .into_iter()
            .map(String::from)
            .collect();
        let issues = red_flags
            .iter()
            .map(|flag| {
                ValidationIssue::new(ValidationIssueType::Integrity, format!("Red flag: {}", flag))
            })
            .collect();

        IntegrityResult {
            text_quality,
            structure_score,
            authenticity_markers,
            red_flags,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let result = IntegrityAssessor::assess("");
        // Only the special-character check passes.
        assert_eq!(result.text_quality, 20);
        assert_eq!(result.structure_score, 0);
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn test_structure_score_maximum_is_35() {
        let result = IntegrityAssessor::assess("ISSUED 01/02/2023");
        assert_eq!(result.structure_score, 35);
    }

    #[test]
    fn test_uppercase_check_is_case_sensitive() {
        assert_eq!(IntegrityAssessor::assess("issued").structure_score, 0);
    }

    #[test]
    fn test_long_plain_text_scores_full_quality() {
        let text = "word ".repeat(70);
        let result = IntegrityAssessor::assess(&text);
        assert_eq!(result.text_quality, 80);
    }

    #[test]
    fn test_markers_and_red_flags() {
        let result = IntegrityAssessor::assess("Official seal. Xerox of the original.");
        assert_eq!(result.authenticity_markers, vec!["official", "seal"]);
        assert_eq!(result.red_flags, vec!["xerox"]);
        assert_eq!(result.issues.len(), 1);
    }
}
