use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::Catalog;
use crate::error::AppError;
use crate::models::download_verification::DownloadVerification;
use crate::storage::{download_extension, BlobStore};

pub const EXPIRED_PATH: &str = "/products/download/expired";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug)]
pub enum Download {
    /// Unknown, malformed or expired token.
    Expired,
    /// The token is valid but its blob could not be read.
    FileMissing,
    File(DownloadFile),
}

#[derive(Debug)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Resolves a download token to the product file it grants access to.
/// The verification is left untouched, so a link works until it expires.
pub async fn resolve_download(
    catalog: &dyn Catalog,
    blobs: &dyn BlobStore,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Download, AppError> {
    let Ok(token) = Uuid::parse_str(token) else {
        debug!(%token, "Malformed download token");
        return Ok(Download::Expired);
    };

    let grant = match catalog.find_download_grant(token).await? {
        Some(g) if !g.is_expired_at(now) => g,
        _ => return Ok(Download::Expired),
    };

    let blob = match blobs.fetch(&grant.file_path).await {
        Ok(b) => b,
        Err(e) => {
            warn!(%token, url = %grant.file_path, error = %e, "Download blob unavailable");
            return Ok(Download::FileMissing);
        }
    };

    // keep the name usable inside a quoted Content-Disposition parameter
    let stem: String = grant
        .product_name
        .chars()
        .map(|c| match c {
            '"' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();
    let file_name = format!("{}.{}", stem, download_extension(&grant.file_path));

    Ok(Download::File(DownloadFile {
        file_name,
        content_type: blob
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        bytes: blob.bytes,
    }))
}

/// Creates a verification for `product_id` that expires after the configured TTL.
pub async fn issue_download_link(
    catalog: &dyn Catalog,
    config: &AppConfig,
    product_id: Uuid,
    now: DateTime<Utc>,
) -> Result<DownloadVerification, AppError> {
    catalog
        .create_download_verification(product_id, now + config.download_link_ttl)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))
}
