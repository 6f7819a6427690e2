// src/handlers/download.rs
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use http::{header, HeaderValue, StatusCode};
use tracing::instrument;

use crate::error::AppError;
use crate::services::downloads::{self, Download, EXPIRED_PATH};
use crate::state::AppState;

// GET /products/download/:token - Serve the purchased file while the link is valid
#[instrument(skip(state))]
pub async fn download_product(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let download =
        downloads::resolve_download(state.catalog.as_ref(), state.blobs.as_ref(), &token, Utc::now()).await?;

    let file = match download {
        Download::Expired => return Ok(Redirect::to(EXPIRED_PATH).into_response()),
        Download::FileMissing => {
            return Ok((StatusCode::NOT_FOUND, "File not found on Blob").into_response())
        }
        Download::File(file) => file,
    };

    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename=\"{}\"", file.file_name).as_bytes(),
    )
    .map_err(|e| AppError::internal(format!("Invalid download filename: {e}")))?;
    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let content_length = HeaderValue::from(file.bytes.len());

    Ok((
        [
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, content_length),
        ],
        file.bytes,
    )
        .into_response())
}

// GET /products/download/expired
pub async fn download_expired() -> &'static str {
    "This download link has expired. Check your purchase receipt or contact support for a new link."
}
