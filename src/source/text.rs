use std::path::Path;

use crate::error::PrepError;

/// Extract text from a plain text file
pub fn extract_text(path: &Path) -> Result<String, PrepError> {
    let bytes = std::fs::read(path).map_err(|source| PrepError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
