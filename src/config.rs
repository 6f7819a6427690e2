// src/config.rs
use std::env;

use chrono::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base of the links put into receipt emails.
    pub public_base_url: String,
    /// Directory backing the local object store.
    pub blob_root: String,
    /// Public prefix under which stored blobs are served.
    pub blob_public_url: String,
    pub download_link_ttl: Duration,
    /// Request body cap for product form submissions.
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(p) => p
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid PORT: {e}")))?,
            Err(_) => 3000,
        };
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::config("DATABASE_URL must be set"))?;
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{host}:{port}"));
        let blob_root = env::var("BLOB_ROOT").unwrap_or_else(|_| "./blobs".to_string());
        let blob_public_url = env::var("BLOB_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/blobs", public_base_url.trim_end_matches('/')));
        let ttl_hours = match env::var("DOWNLOAD_LINK_TTL_HOURS") {
            Ok(h) => h
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=87_600).contains(h))
                .ok_or_else(|| AppError::config(format!("Invalid DOWNLOAD_LINK_TTL_HOURS: {h}")))?,
            Err(_) => 24,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_MB") {
            Ok(mb) => upload_limit_bytes(&mb)?,
            Err(_) => 200 * 1024 * 1024,
        };

        tracing::info!(%host, port, %blob_root, "Configuration loaded");

        Ok(Self {
            host,
            port,
            database_url,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            blob_root,
            blob_public_url: blob_public_url.trim_end_matches('/').to_string(),
            download_link_ttl: Duration::hours(ttl_hours),
            max_upload_bytes,
        })
    }

    /// Link handed to customers for a download verification token.
    pub fn download_url(&self, token: &str) -> String {
        format!("{}/products/download/{}", self.public_base_url, token)
    }
}

/// MAX_UPLOAD_MB in bytes; values that overflow `usize` are rejected.
fn upload_limit_bytes(mb: &str) -> Result<usize, AppError> {
    mb.trim()
        .parse::<usize>()
        .ok()
        .and_then(|mb| mb.checked_mul(1024 * 1024))
        .ok_or_else(|| AppError::config(format!("Invalid MAX_UPLOAD_MB: {mb}")))
}
