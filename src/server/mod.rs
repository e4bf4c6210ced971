//! Upload service: a single-page form that converts one PDF per request.

mod pages;
mod upload;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Path as UrlPath, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::extract::Scanner;

/// Room for multipart boundaries and part headers on top of the file limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Per-process request state. Everything in here is read-only; each
/// conversion builds its own scan context.
#[derive(Clone)]
pub struct AppState {
    scanner: Arc<Scanner>,
    upload_dir: PathBuf,
    output_dir: PathBuf,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let scanner =
            Scanner::from_config(config).context("Invalid prep product list in config")?;
        Ok(Self {
            scanner: Arc::new(scanner),
            upload_dir: PathBuf::from(&config.server.upload_dir),
            output_dir: PathBuf::from(&config.server.output_dir),
            max_upload_bytes: config.server.max_upload_bytes,
        })
    }

    /// Create the upload and output directories
    pub fn prepare_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.output_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Error creating directory {}", dir.display()))?;
        }
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload::upload))
        .route("/output/{file}", get(download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn run(config: &Config) -> Result<()> {
    let state = AppState::new(config)?;
    state.prepare_dirs()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind upload service to {}", addr))?;

    tracing::info!("Upload service listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Upload service error")?;

    Ok(())
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn download(State(state): State<AppState>, UrlPath(file): UrlPath<String>) -> Response {
    if !is_output_name(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(state.output_dir.join(&file)).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!("Download of {} failed: {}", file, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Only plain `.csv` names produced by the upload handler can be served
fn is_output_name(name: &str) -> bool {
    name.ends_with(".csv")
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
