use crate::utils::DocCheckError;

/// Messages an extraction backend may return in place of document text.
pub const FAILURE_SENTINELS: &[&str] = &[
    "Error",
    "OCR not available",
    "No text could be extracted",
    "File not found",
];

/// Source of document text: OCR, PDF text layer or plain files.
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of a document.
    fn extract_text(&self, document: &[u8]) -> Result<String, DocCheckError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Treats the document as UTF-8 text. Invalid sequences are replaced.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, document: &[u8]) -> Result<String, DocCheckError> {
        Ok(String::from_utf8_lossy(document).into_owned())
    }

    fn backend_name(&self) -> &str {
        "plain-text"
    }
}

/// True when a backend reported failure through its text output.
pub fn is_failure_sentinel(text: &str) -> bool {
    FAILURE_SENTINELS.iter().any(|prefix| text.starts_with(prefix))
}
