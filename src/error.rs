use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort processing of a whole document or upload.
///
/// Per-line problems never show up here; the extractors resolve those to
/// their field defaults.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedInput(String),

    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("File too large (limit is {limit} bytes)")]
    TooLarge { limit: usize },

    #[error("No file uploaded.")]
    MissingUpload,

    #[error("Malformed upload: {0}")]
    InvalidUpload(String),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepError {
    /// True for failures caused by the uploaded request itself rather than
    /// by processing it.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PrepError::NotPdf
                | PrepError::TooLarge { .. }
                | PrepError::MissingUpload
                | PrepError::InvalidUpload(_)
        )
    }
}
