use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::AppState;
use super::pages;
use crate::cli::ExportFormat;
use crate::error::PrepError;
use crate::pipeline;

const PDF_MIME: &str = "application/pdf";
const UPLOAD_FIELD: &str = "pdf";

/// An uploaded file on disk. Removed when dropped, whatever the outcome of
/// the request.
struct TempUpload {
    path: PathBuf,
    base_name: String,
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed upload {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Error cleaning up uploaded file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            let err = PrepError::InvalidUpload(rejection.body_text());
            return rejection_response(&err);
        }
    };

    let upload = match receive_pdf(&state, &mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return rejection_response(&e),
    };

    let output_name = format!("{}.csv", upload.base_name);
    let output_path = state.output_dir.join(&output_name);
    let input_path = upload.path.clone();
    let scanner = Arc::clone(&state.scanner);

    let joined = tokio::task::spawn_blocking(move || {
        pipeline::process_file(&input_path, &output_path, ExportFormat::Csv, &scanner)
    })
    .await;
    drop(upload);

    match joined {
        Ok(outcome) if outcome.success => {
            Html(pages::success_page(&output_name, outcome.records)).into_response()
        }
        Ok(outcome) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(pages::error_page("Error During Conversion", &outcome.message)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Conversion task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(
                    "Error During Conversion",
                    "Conversion task failed",
                )),
            )
                .into_response()
        }
    }
}

/// Store the `pdf` field of the form. Checks happen before anything touches
/// disk, so rejected uploads leave nothing behind.
async fn receive_pdf(state: &AppState, multipart: &mut Multipart) -> Result<TempUpload, PrepError> {
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if field.content_type() != Some(PDF_MIME) {
            return Err(PrepError::NotPdf);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit))?;
        if bytes.len() > limit {
            return Err(PrepError::TooLarge { limit });
        }

        let upload = TempUpload {
            path: state.upload_dir.join(unique_name()),
            base_name: base_name(&original_name),
        };
        tokio::fs::write(&upload.path, &bytes)
            .await
            .map_err(|source| PrepError::Write {
                path: upload.path.clone(),
                source,
            })?;

        tracing::info!(
            "Received '{}' ({} bytes) as {}",
            original_name,
            bytes.len(),
            upload.path.display()
        );
        return Ok(upload);
    }

    Err(PrepError::MissingUpload)
}

fn multipart_error(e: MultipartError, limit: usize) -> PrepError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PrepError::TooLarge { limit }
    } else {
        PrepError::InvalidUpload(e.body_text())
    }
}

fn rejection_response(e: &PrepError) -> Response {
    let status = match e {
        PrepError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        e if e.is_rejection() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("Upload rejected ({}): {}", status, e);

    (status, Html(pages::error_page("Upload Rejected", &e.to_string()))).into_response()
}

fn unique_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{}-{}.pdf", millis, Uuid::new_v4().simple())
}

/// Output base name derived from the client's file name, restricted to
/// characters that are safe in a path segment and a URL.
fn base_name(original: &str) -> String {
    let last = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = Path::new(last)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    let mut cleaned = String::with_capacity(stem.len());
    for c in stem.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            c
        } else {
            '_'
        };
        // Runs of dots collapse to one so the name never holds `..`
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("Plenvu Instructions.pdf"), "Plenvu_Instructions");
        assert_eq!(base_name("../../etc/passwd.pdf"), "passwd");
        assert_eq!(base_name("C:\\docs\\prep.v2.pdf"), "prep.v2");
        assert_eq!(base_name("..."), "document");
        assert_eq!(base_name(""), "document");
        assert_eq!(base_name("prep..v2.pdf"), "prep.v2");
        assert_eq!(base_name("a...b..c.pdf"), "a.b.c");
    }

    #[test]
    fn test_base_name_is_always_downloadable() {
        let names = [
            "prep..v2.pdf",
            "a..b.pdf",
            "..hidden..pdf",
            "../../x..y.pdf",
            "Plenvu Instructions (final).pdf",
            "...",
            "",
        ];
        for name in names {
            let output = format!("{}.csv", base_name(name));
            assert!(crate::server::is_output_name(&output), "{name} -> {output}");
        }
    }

    #[test]
    fn test_unique_name_is_pdf() {
        let a = unique_name();
        let b = unique_name();
        assert!(a.ends_with(".pdf"));
        assert_ne!(a, b);
    }
}
