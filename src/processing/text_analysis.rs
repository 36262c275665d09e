use crate::models::TextSignals;
use lazy_static::lazy_static;
use regex::Regex;

pub const GOVERNMENT_TERMS: &[&str] = &["government", "सरकार", "authority", "प्राधिकरण"];

lazy_static! {
    pub static ref DATE_PATTERN: Regex = Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{4}").unwrap();
    static ref DIGIT_PATTERN: Regex = Regex::new(r"\d").unwrap();
}

pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn analyze(text: &str) -> TextSignals {
        let lower = text.to_lowercase();

        TextSignals {
            has_numbers: DIGIT_PATTERN.is_match(text),
            has_dates: DATE_PATTERN.is_match(text),
            has_government_terms: GOVERNMENT_TERMS.iter().any(|term| lower.contains(term)),
            has_devanagari: Self::has_devanagari(text),
            text_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            dominant_script: whatlang::detect_script(text).map(|script| script.name().to_string()),
        }
    }

    pub fn has_devanagari(text: &str) -> bool {
        text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
    }

    /// Lowercase and collapse all whitespace runs to single spaces.
    pub fn normalize(text: &str) -> String {
        text.to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_all_false() {
        let signals = TextAnalyzer::analyze("");
        assert!(!signals.has_numbers);
        assert!(!signals.has_dates);
        assert!(!signals.has_government_terms);
        assert!(!signals.has_devanagari);
        assert_eq!(signals.text_length, 0);
        assert_eq!(signals.word_count, 0);
    }

    #[test]
    fn test_bilingual_certificate_signals() {
        let text = "महाराष्ट्र शासन GOVERNMENT OF MAHARASHTRA issued on 12/04/2023";
        let signals = TextAnalyzer::analyze(text);
        assert!(signals.has_numbers);
        assert!(signals.has_dates);
        assert!(signals.has_government_terms);
        assert!(signals.has_devanagari);
        assert_eq!(signals.word_count, 8);
    }

    #[test]
    fn test_devanagari_government_term() {
        let signals = TextAnalyzer::analyze("भारत सरकार");
        assert!(signals.has_government_terms);
        assert!(signals.has_devanagari);
        assert_eq!(signals.dominant_script.as_deref(), Some("Devanagari"));
    }

    #[test]
    fn test_date_requires_four_digit_year() {
        assert!(!TextAnalyzer::analyze("issued 12/04/23").has_dates);
        assert!(TextAnalyzer::analyze("issued 1-4-2023").has_dates);
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(
            TextAnalyzer::normalize("  INCOME\n\tCertificate  No "),
            "income certificate no"
        );
    }
}
