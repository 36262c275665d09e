pub mod analytics;
pub mod config;
pub mod document_checker;
pub mod models;
pub mod processing;
pub mod utils;
pub mod validation;

pub use analytics::{AnalyticsEntry, AnalyticsLog, AnalyticsSummary};
pub use config::ScoringConfig;
pub use document_checker::DocumentChecker;
pub use models::{CheckOutcome, PatternLibrary, RejectionKind, ValidationReport};
pub use utils::DocCheckError;
