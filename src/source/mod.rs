mod pdf;
mod text;

use std::path::Path;

use crate::error::PrepError;

/// Raw text of a source document, dispatched on file extension.
///
/// PDFs go through the PDF text extractor; `.txt` files are taken verbatim,
/// which is useful for text that was extracted elsewhere.
pub fn extract_text(path: &Path) -> Result<String, PrepError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => pdf::extract_text(path),
        "txt" => text::extract_text(path),
        _ => Err(PrepError::UnsupportedInput(extension)),
    }
}
