use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DocCheckError {
    #[error("invalid pattern for field '{field}' of document type '{doc_type}': {source}")]
    InvalidPattern {
        doc_type: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid pattern library: {0}")]
    InvalidLibrary(String),

    #[error("unknown document type '{requested}'. Available types: {}", available.join(", "))]
    UnknownDocumentType {
        requested: String,
        available: Vec<String>,
    },

    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("failed to load configuration from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
