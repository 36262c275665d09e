// Field extraction for a classified document
use crate::config::ScoringConfig;
use crate::models::{DocumentTypeSpec, FieldResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

/// Keyword-density validator for a required field with no pattern.
struct HeuristicField {
    field: &'static str,
    terms: &'static [&'static str],
    weight: u32,
    base: u32,
}

const HEURISTIC_FIELDS: &[HeuristicField] = &[
    HeuristicField {
        field: "signature_stamp",
        terms: &["signature", "stamp", "seal", "signed", "authorized", "हस्ताक्षर"],
        weight: 25,
        base: 25,
    },
    HeuristicField {
        field: "issuing_authority",
        terms: &["tahsildar", "collector", "registrar", "officer", "authority", "प्राधिकरण"],
        weight: 30,
        base: 30,
    },
    HeuristicField {
        field: "address",
        terms: &["address", "पता", "residence", "निवास", "village", "city", "district"],
        weight: 20,
        base: 40,
    },
];

lazy_static! {
    static ref IDENTITY_NUMBER: Regex = Regex::new(r"\b(\d{4})[\s\-]*(\d{4})[\s\-]*(\d{4})\b").unwrap();
    static ref NAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)name[:\s]*([A-Za-z\s]{3,50})").unwrap(),
        Regex::new(r"(?i)([A-Za-z\s]{3,50})\s*(?:s/o|d/o|w/o)").unwrap(),
        Regex::new(r"(?i)(?:mr|ms|mrs)\.?\s*([A-Za-z\s]{3,50})").unwrap(),
    ];
    static ref DOB_PATTERN: Regex =
        Regex::new(r"(?i)(?:dob|date of birth|born)[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{4})").unwrap();
    static ref MALE_PATTERN: Regex = Regex::new(r"(?i)\b(male|पुरुष)\b").unwrap();
    static ref FEMALE_PATTERN: Regex = Regex::new(r"(?i)\b(female|महिला)\b").unwrap();
}

pub struct FieldExtractor<'a> {
    config: &'a ScoringConfig,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        FieldExtractor { config }
    }

    /// One result per required field of `spec`.
    pub fn extract(&self, text: &str, spec: &DocumentTypeSpec) -> BTreeMap<String, FieldResult> {
        let lower = text.to_lowercase();
        spec.required_fields
            .iter()
            .map(|field| {
                let result = match spec.pattern_for(field) {
                    Some(pattern) => {
                        let mut matches = pattern.regex.captures_iter(text);
                        match matches.next() {
                            Some(first) => {
                                let count = 1 + matches.count() as u32;
                                let value = first
                                    .get(pattern.value_group.unwrap_or(0))
                                    .or_else(|| first.get(0))
                                    .map(|m| m.as_str().to_string());
                                FieldResult {
                                    found: true,
                                    confidence: self.pattern_confidence(count),
                                    extracted_value: value,
                                }
                            }
                            None => FieldResult::missing(),
                        }
                    }
                    None => self.heuristic(field, &lower),
                };
                (field.clone(), result)
            })
            .collect()
    }

    fn pattern_confidence(&self, matches: u32) -> u32 {
        let confidence = matches
            .saturating_mul(self.config.pattern_confidence_per_match)
            .saturating_add(self.config.pattern_confidence_base);
        confidence.min(100)
    }

    fn heuristic(&self, field: &str, lower: &str) -> FieldResult {
        match HEURISTIC_FIELDS.iter().find(|h| h.field == field) {
            Some(heuristic) => {
                let matches = heuristic
                    .terms
                    .iter()
                    .filter(|term| lower.contains(*term))
                    .count() as u32;
                if matches == 0 {
                    return FieldResult::missing();
                }
                FieldResult {
                    found: true,
                    confidence: (matches * heuristic.weight + heuristic.base).min(100),
                    extracted_value: None,
                }
            }
            // Fields nobody knows how to check are given the benefit of the doubt.
            None => FieldResult {
                found: true,
                confidence: self.config.generic_field_confidence,
                extracted_value: None,
            },
        }
    }
}

/// Structured details printed on an identity card: number, name, date of
/// birth and gender.
pub fn extract_identity_details(text: &str) -> BTreeMap<String, String> {
    let mut details = BTreeMap::new();

    if let Some(captures) = IDENTITY_NUMBER.captures(text) {
        let number = format!("{} {} {}", &captures[1], &captures[2], &captures[3]);
        details.insert("aadhaar_number".to_string(), number);
    }

    for pattern in NAME_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(matched) = captures.get(1) {
                details.insert("name".to_string(), matched.as_str().trim().to_string());
                break;
            }
        }
    }

    if let Some(captures) = DOB_PATTERN.captures(text) {
        details.insert("dob".to_string(), captures[1].to_string());
    }

    if MALE_PATTERN.is_match(text) {
        details.insert("gender".to_string(), "Male".to_string());
    } else if FEMALE_PATTERN.is_match(text) {
        details.insert("gender".to_string(), "Female".to_string());
    }

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternLibrary;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pattern_field_confidence_and_group() {
        let library = PatternLibrary::builtin();
        let spec = library.get("income_certificate").unwrap();
        let config = ScoringConfig::default();
        let text = "Certificate No: INC/2024/001234 annual income Rs. 45,000";

        let fields = FieldExtractor::new(&config).extract(text, spec);

        let number = &fields["certificate_number"];
        assert!(number.found);
        assert_eq!(number.confidence, 70);
        assert_eq!(number.extracted_value.as_deref(), Some("INC/2024/001234"));

        let income = &fields["annual_income"];
        assert_eq!(income.extracted_value.as_deref(), Some("45,000"));
    }

    #[test]
    fn test_confidence_caps_at_100() {
        let library = PatternLibrary::builtin();
        let spec = library.get("birth_certificate").unwrap();
        let config = ScoringConfig::default();
        let text = "01/01/2000 02/02/2001 03/03/2002";

        let fields = FieldExtractor::new(&config).extract(text, spec);
        assert_eq!(fields["dob"].confidence, 100);
    }

    #[test]
    fn test_heuristic_fields() {
        let library = PatternLibrary::builtin();
        let spec = library.get("caste_certificate").unwrap();
        let config = ScoringConfig::default();

        let fields = FieldExtractor::new(&config).extract("Signed and sealed, stamp below", spec);
        // "signed", "seal" and "stamp"
        assert_eq!(fields["signature_stamp"].confidence, 100);

        let fields = FieldExtractor::new(&config).extract("seal", spec);
        assert_eq!(fields["signature_stamp"].confidence, 50);
    }

    #[test]
    fn test_missing_field_has_zero_confidence() {
        let library = PatternLibrary::builtin();
        let spec = library.get("income_certificate").unwrap();
        let config = ScoringConfig::default();

        let fields = FieldExtractor::new(&config).extract("nothing relevant", spec);
        assert_eq!(fields["issuing_authority"], FieldResult::missing());
        assert_eq!(fields["validity_date"], FieldResult::missing());
    }

    #[test]
    fn test_unknown_heuristic_field_is_lenient() {
        let json = r#"[{"id": "permit", "keywords": ["permit"], "required_fields": ["holder_photo"]}]"#;
        let library = PatternLibrary::from_json_str(json).unwrap();
        let config = ScoringConfig::default();

        let fields = FieldExtractor::new(&config).extract("", library.get("permit").unwrap());
        assert!(fields["holder_photo"].found);
        assert_eq!(fields["holder_photo"].confidence, 50);
    }

    #[test]
    fn test_identity_details() {
        let text = "Name: Anita Sharma\nDOB: 14/08/1992\nFemale\n1234-5678 9012";
        let details = extract_identity_details(text);
        assert_eq!(details["aadhaar_number"], "1234 5678 9012");
        assert_eq!(details["dob"], "14/08/1992");
        assert_eq!(details["gender"], "Female");
        assert!(details["name"].starts_with("Anita Sharma"));
    }
}
