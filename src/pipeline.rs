//! Document-level driver: source text → lines → records → table.

use std::path::Path;

use crate::cli::ExportFormat;
use crate::error::PrepError;
use crate::export;
use crate::extract::{InstructionRecord, Scanner, normalize_lines};
use crate::source;

/// Result of converting one document, reported to callers instead of an
/// error so the CLI and the upload service can present it directly.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub success: bool,
    pub message: String,
    pub records: usize,
}

/// Extract, normalize and scan a document
pub fn extract_records(
    path: &Path,
    scanner: &Scanner,
) -> Result<Vec<InstructionRecord>, PrepError> {
    let text = source::extract_text(path)?;
    let lines = normalize_lines(&text);
    tracing::debug!("{} lines after normalization", lines.len());

    Ok(scanner.scan(&lines))
}

/// Convert `input` and write the table to `output`.
///
/// Either every record is written or nothing is.
pub fn process_file(
    input: &Path,
    output: &Path,
    format: ExportFormat,
    scanner: &Scanner,
) -> ConversionOutcome {
    let result = extract_records(input, scanner)
        .and_then(|records| export::export_records(&records, format, output).map(|_| records.len()));

    match result {
        Ok(count) => {
            tracing::info!(
                "Wrote {} records from {} to {}",
                count,
                input.display(),
                output.display()
            );
            ConversionOutcome {
                success: true,
                message: format!(
                    "{} file has been created successfully",
                    format.to_string().to_uppercase()
                ),
                records: count,
            }
        }
        Err(e) => {
            tracing::error!("Error processing PDF: {}", e);
            ConversionOutcome {
                success: false,
                message: format!("Error processing PDF: {}", e),
                records: 0,
            }
        }
    }
}
