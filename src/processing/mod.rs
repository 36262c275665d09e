pub mod classifier;
pub mod extraction;
pub mod extractors;
pub mod text_analysis;

pub use classifier::TypeClassifier;
pub use extraction::{PlainTextExtractor, TextExtractor};
pub use extractors::{extract_identity_details, FieldExtractor};
pub use text_analysis::TextAnalyzer;
