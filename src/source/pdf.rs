use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::PrepError;

/// Extract text from a PDF file
pub fn extract_text(path: &Path) -> Result<String, PrepError> {
    let bytes = std::fs::read(path).map_err(|source| PrepError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    extract_text_from_bytes(&bytes).map_err(|reason| PrepError::Extraction {
        path: path.to_path_buf(),
        reason,
    })
}

/// The PDF library can panic on malformed documents; that is reported like
/// any other extraction failure.
fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, String> {
    if !bytes.starts_with(b"%PDF") {
        return Err("missing %PDF header".to_string());
    }

    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("PDF parser panicked on malformed input".to_string()),
    }
}
