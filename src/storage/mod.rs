//! Public-read blob storage for product files and images.
//!
//! Blobs are addressed by the public URL handed back from [`BlobStore::put`];
//! that URL is what the product row stores.

mod keys;
mod object;

pub use keys::{download_extension, new_blob_key, BlobKind};
pub use object::ObjectBlobStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("url is not served by this store: {0}")]
    ForeignUrl(String),
    #[error("object store error: {0}")]
    Backend(#[from] object_store::Error),
}

/// A blob read back from storage.
#[derive(Debug, Clone)]
pub struct FetchedBlob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key` and return the blob's public URL.
    async fn put(&self, key: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, BlobError>;

    async fn fetch(&self, url: &str) -> Result<FetchedBlob, BlobError>;

    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}
