use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::cli::ExportFormat;
use crate::error::PrepError;
use crate::extract::{COLUMNS, InstructionRecord};

/// Write records to `path` in the given format.
///
/// The table is staged in its own temp file next to the target and renamed
/// into place, so a failed write never leaves a partial table behind and
/// concurrent exports to the same target never share a staging file.
pub fn export_records(
    records: &[InstructionRecord],
    format: ExportFormat,
    path: &Path,
) -> Result<(), PrepError> {
    let write_err = |source| PrepError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;

    if let Err(e) = write_records(records, format, staged.as_file_mut()) {
        let staged_path = staged.path().to_path_buf();
        if let Err(cleanup) = staged.close() {
            tracing::warn!(
                "Error cleaning up staged export {}: {}",
                staged_path.display(),
                cleanup
            );
        }
        return Err(write_err(e));
    }

    staged
        .persist(path)
        .map(|_| ())
        .map_err(|e| write_err(e.error))
}

fn write_records(
    records: &[InstructionRecord],
    format: ExportFormat,
    file: &mut File,
) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(records, &mut writer)?,
        ExportFormat::Json => write_json(records, &mut writer)?,
    }
    writer.flush()
}

/// Write the CSV table: header row, then one row per record
pub fn write_csv<W: Write>(records: &[InstructionRecord], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;

    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            escape_csv(&record.bowelprep),
            record.order,
            record.category,
            escape_csv(&record.message),
            record.offset,
            record.time.map(|t| t.to_string()).unwrap_or_default(),
            record.split,
            record.procedure_time
        )?;
    }

    Ok(())
}

/// Write records as a pretty-printed JSON array
pub fn write_json<W: Write>(records: &[InstructionRecord], writer: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)
}

/// Quote a field only when it contains a delimiter, quote or line break
fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
