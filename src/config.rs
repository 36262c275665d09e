use crate::utils::DocCheckError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable scoring constants used across the check pipeline.
///
/// Every field has a default, so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum composite score for a document to be considered valid.
    pub validity_threshold: f64,
    /// Minimum weighted classification total accepted by the primary classifier.
    pub min_classification_score: f64,
    /// Trimmed text shorter than this (in characters) is rejected outright.
    pub min_text_length: usize,
    /// Documents expiring within this many days are flagged as expiring soon.
    pub expiry_warning_days: i64,
    pub pattern_confidence_per_match: u32,
    pub pattern_confidence_base: u32,
    /// Confidence given to required fields with neither a pattern nor a heuristic.
    pub generic_field_confidence: u32,
    pub red_flag_penalty: f64,
    pub low_security_threshold: f64,
    pub analytics_capacity: usize,
    pub text_sample_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            validity_threshold: 0.6,
            min_classification_score: 2.0,
            min_text_length: 10,
            expiry_warning_days: 30,
            pattern_confidence_per_match: 30,
            pattern_confidence_base: 40,
            generic_field_confidence: 50,
            red_flag_penalty: 0.1,
            low_security_threshold: 0.5,
            analytics_capacity: 100,
            text_sample_chars: 200,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self, DocCheckError> {
        let content = fs::read_to_string(path).map_err(|e| DocCheckError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: ScoringConfig =
            serde_json::from_str(&content).map_err(|e| DocCheckError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate().map_err(|reason| DocCheckError::Config {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(config)
    }

    /// Check that the values are usable, returning the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.validity_threshold) {
            return Err(format!(
                "validity_threshold must be within [0, 1], got {}",
                self.validity_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.low_security_threshold) {
            return Err(format!(
                "low_security_threshold must be within [0, 1], got {}",
                self.low_security_threshold
            ));
        }
        if self.min_classification_score < 0.0 {
            return Err("min_classification_score must not be negative".to_string());
        }
        if self.red_flag_penalty < 0.0 {
            return Err("red_flag_penalty must not be negative".to_string());
        }
        if self.generic_field_confidence > 100 {
            return Err("generic_field_confidence must be at most 100".to_string());
        }
        if self.analytics_capacity == 0 {
            return Err("analytics_capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_constants() {
        let config = ScoringConfig::default();
        assert_eq!(config.validity_threshold, 0.6);
        assert_eq!(config.min_classification_score, 2.0);
        assert_eq!(config.min_text_length, 10);
        assert_eq!(config.analytics_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"validity_threshold": 0.75, "expiry_warning_days": 60}}"#).unwrap();

        let config = ScoringConfig::load(file.path()).unwrap();
        assert_eq!(config.validity_threshold, 0.75);
        assert_eq!(config.expiry_warning_days, 60);
        assert_eq!(config.red_flag_penalty, 0.1);
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"validity_threshold": 1.5}}"#).unwrap();

        let err = ScoringConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, DocCheckError::Config { .. }));
        assert!(err.to_string().contains("validity_threshold"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ScoringConfig::load(Path::new("/nonexistent/doccheck.json")).unwrap_err();
        assert!(matches!(err, DocCheckError::Config { .. }));
    }
}
