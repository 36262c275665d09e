use crate::models::{ClassificationMethod, ClassificationScore, DocumentTypeSpec, PatternLibrary};
use crate::processing::text_analysis::TextAnalyzer;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

const CERTIFICATE_TERMS: &[&str] = &["certificate", "प्रमाणपत्र"];

/// Relaxed certificate sub-classification, checked in this order.
const FALLBACK_CERTIFICATES: &[(&str, &[&str])] = &[
    ("income_certificate", &["income", "उत्पन्न"]),
    ("caste_certificate", &["caste", "जात"]),
    ("domicile_certificate", &["domicile", "निवास"]),
    ("birth_certificate", &["birth", "जन्म"]),
];

lazy_static! {
    static ref IDENTITY_INDICATORS: Vec<Regex> = vec![
        Regex::new(r"\d{4}[\s\-]*\d{4}[\s\-]*\d{4}").unwrap(),
        Regex::new(r"(?i)male|female|पुरुष|महिला").unwrap(),
        Regex::new(r"(?i)dob|date of birth|जन्म").unwrap(),
        Regex::new(r"(?i)address|पता").unwrap(),
    ];
}

/// Scores text against every registered document type.
pub struct TypeClassifier<'a> {
    library: &'a PatternLibrary,
    min_score: f64,
}

impl<'a> TypeClassifier<'a> {
    pub fn new(library: &'a PatternLibrary, min_score: f64) -> Self {
        TypeClassifier { library, min_score }
    }

    /// Breakdown for every type, in library order.
    pub fn score_all(&self, text: &str) -> Vec<ClassificationScore> {
        let normalized = TextAnalyzer::normalize(text);
        let lower = text.to_lowercase();
        let signals = TextAnalyzer::analyze(text);

        self.library
            .iter()
            .map(|spec| {
                let (keyword_score, matched_keywords) = Self::keyword_score(spec, &normalized);
                let pattern_score = Self::pattern_score(spec, text);
                let context_score = Self::context_score(spec, text, &lower);

                let mut structure_score = 0;
                if signals.has_government_terms {
                    structure_score += 2;
                }
                if signals.has_dates {
                    structure_score += 1;
                }
                if signals.has_devanagari && spec.bilingual {
                    structure_score += 1;
                }

                ClassificationScore {
                    document_type: spec.id.clone(),
                    keyword_score,
                    pattern_score,
                    context_score,
                    structure_score,
                    matched_keywords,
                }
            })
            .collect()
    }

    /// Highest scoring type, if it clears the minimum score. Ties go to the
    /// type registered first.
    pub fn best_match(&self, text: &str) -> Option<ClassificationScore> {
        let mut best: Option<ClassificationScore> = None;
        for score in self.score_all(text) {
            if score.total() > 0.0 {
                debug!(
                    "{}: {:.1} (keywords {}, patterns {}, context {}, structure {})",
                    score.document_type,
                    score.total(),
                    score.keyword_score,
                    score.pattern_score,
                    score.context_score,
                    score.structure_score
                );
            }
            let better = match &best {
                Some(current) => score.total() > current.total(),
                None => true,
            };
            if better {
                best = Some(score);
            }
        }

        best.filter(|score| score.total() >= self.min_score)
    }

    pub fn classify(&self, text: &str) -> Option<String> {
        self.best_match(text).map(|score| score.document_type)
    }

    /// Relaxed heuristics for text the weighted scoring could not place.
    pub fn fallback_detect(&self, text: &str) -> Option<String> {
        let indicators = IDENTITY_INDICATORS
            .iter()
            .filter(|pattern| pattern.is_match(text))
            .count();
        if indicators >= 2 {
            if let Some(identity) = self.library.identity_type() {
                return Some(identity.id.clone());
            }
        }

        let lower = text.to_lowercase();
        if !CERTIFICATE_TERMS.iter().any(|term| lower.contains(term)) {
            return None;
        }

        FALLBACK_CERTIFICATES
            .iter()
            .filter(|(_, terms)| terms.iter().any(|term| lower.contains(term)))
            .find_map(|(id, _)| self.library.get(id))
            .map(|spec| spec.id.clone())
    }

    /// Primary classification, then the fallback heuristics.
    pub fn detect(&self, text: &str) -> Option<(String, ClassificationMethod)> {
        if let Some(best) = self.best_match(text) {
            debug!("Detected document type: {} ({:.1})", best.document_type, best.total());
            let score = best.total();
            return Some((best.document_type, ClassificationMethod::Primary { score }));
        }

        debug!("Primary detection failed, trying fallback");
        self.fallback_detect(text)
            .map(|id| (id, ClassificationMethod::Fallback))
    }

    fn keyword_score(spec: &DocumentTypeSpec, normalized: &str) -> (u32, Vec<String>) {
        let mut score = 0;
        let mut matched = Vec::new();
        for keyword in &spec.keywords {
            let keyword_lower = keyword.to_lowercase();
            if normalized.contains(&keyword_lower) {
                score += 3;
                matched.push(keyword.clone());
            } else if keyword_lower
                .split_whitespace()
                .any(|word| word.chars().count() > 2 && normalized.contains(word))
            {
                score += 1;
            }
        }
        (score, matched)
    }

    fn pattern_score(spec: &DocumentTypeSpec, text: &str) -> u32 {
        let identity_field = spec.identity_number_field.as_deref();
        spec.field_patterns
            .iter()
            .filter(|pattern| pattern.regex.is_match(text))
            .map(|pattern| {
                if Some(pattern.field.as_str()) == identity_field {
                    5
                } else {
                    2
                }
            })
            .sum()
    }

    fn context_score(spec: &DocumentTypeSpec, text: &str, lower: &str) -> u32 {
        let mut score = 2 * spec
            .context_terms
            .iter()
            .filter(|term| lower.contains(term.as_str()))
            .count() as u32;

        // The identity number already earned pattern points above. Counting it
        // again here is a deliberate bias toward the identity-number type.
        if spec
            .identity_pattern()
            .map_or(false, |pattern| pattern.regex.is_match(text))
        {
            score += 5;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(library: &PatternLibrary) -> TypeClassifier<'_> {
        TypeClassifier::new(library, 2.0)
    }

    #[test]
    fn test_income_certificate_scores_highest() {
        let library = PatternLibrary::builtin();
        let text = "INCOME CERTIFICATE issued by Tahsildar. Annual income Rs. 45,000";
        assert_eq!(
            classifier(&library).classify(text).as_deref(),
            Some("income_certificate")
        );
    }

    #[test]
    fn test_keyword_exact_and_partial_credit() {
        let library = PatternLibrary::builtin();
        let scores = classifier(&library).score_all("Caste certificate from the collector");
        let caste = scores
            .iter()
            .find(|s| s.document_type == "caste_certificate")
            .unwrap();
        // "caste certificate" and "collector" exact, "जात प्रमाणपत्र" none,
        // "government of maharashtra" none, "tahsildar" none.
        assert_eq!(caste.keyword_score, 6);
        assert_eq!(
            caste.matched_keywords,
            vec!["caste certificate".to_string(), "collector".to_string()]
        );

        let income = scores
            .iter()
            .find(|s| s.document_type == "income_certificate")
            .unwrap();
        // Partial credit via "certificate" from "income certificate".
        assert_eq!(income.keyword_score, 1);
    }

    #[test]
    fn test_identity_number_counted_in_pattern_and_context() {
        let library = PatternLibrary::builtin();
        let scores = classifier(&library).score_all("1234 5678 9012");
        let aadhaar = &scores[0];
        assert_eq!(aadhaar.document_type, "aadhaar");
        // 12-digit pattern with its identity bonus, nothing else matches.
        assert_eq!(aadhaar.pattern_score, 5);
        assert_eq!(aadhaar.context_score, 5);
    }

    #[test]
    fn test_devanagari_bonus_only_for_bilingual_types() {
        let library = PatternLibrary::builtin();
        let scores = classifier(&library).score_all("उत्पन्न");
        for score in &scores {
            let spec = library.get(&score.document_type).unwrap();
            assert_eq!(score.structure_score, u32::from(spec.bilingual));
        }
    }

    #[test]
    fn test_below_threshold_returns_none() {
        let library = PatternLibrary::builtin();
        assert_eq!(classifier(&library).classify("hello there"), None);
    }

    #[test]
    fn test_fallback_identity_indicators() {
        let library = PatternLibrary::builtin();
        let c = classifier(&library);
        assert_eq!(c.fallback_detect("male, address unknown").as_deref(), Some("aadhaar"));
        assert_eq!(c.fallback_detect("male only"), None);
    }

    #[test]
    fn test_fallback_certificate_order() {
        let library = PatternLibrary::builtin();
        let c = classifier(&library);
        assert_eq!(
            c.fallback_detect("certificate of caste and income").as_deref(),
            Some("income_certificate")
        );
        assert_eq!(
            c.fallback_detect("प्रमाणपत्र निवास").as_deref(),
            Some("domicile_certificate")
        );
        assert_eq!(c.fallback_detect("income statement"), None);
    }

    #[test]
    fn test_detect_reports_method() {
        let library = PatternLibrary::builtin();
        let c = classifier(&library);
        match c.detect("certificate for birth") {
            Some((id, ClassificationMethod::Fallback)) => assert_eq!(id, "birth_certificate"),
            other => panic!("unexpected detection: {other:?}"),
        }
    }

    #[test]
    fn test_ties_go_to_first_registered_type() {
        let json = r#"[
            {"id": "first_permit", "keywords": ["permit"], "required_fields": ["a"]},
            {"id": "second_permit", "keywords": ["permit"], "required_fields": ["a"]}
        ]"#;
        let library = PatternLibrary::from_json_str(json).unwrap();
        let c = TypeClassifier::new(&library, 1.0);
        assert_eq!(c.classify("permit permit").as_deref(), Some("first_permit"));
    }
}
