use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};

use super::{BlobError, BlobStore, FetchedBlob};

/// [`BlobStore`] over any `object_store` backend, publishing blobs under
/// `{public_base_url}/{key}`.
#[derive(Clone)]
pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
    // LocalFileSystem rejects puts that carry attributes
    keep_content_type: bool,
}

impl ObjectBlobStore {
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            public_base_url,
            keep_content_type: true,
        }
    }

    /// Local directory backend; the directory is created if missing.
    pub fn local(root: &str, public_base_url: impl Into<String>) -> Result<Self, BlobError> {
        std::fs::create_dir_all(root).map_err(|e| {
            BlobError::Backend(object_store::Error::Generic {
                store: "LocalFileSystem",
                source: Box::new(e),
            })
        })?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self {
            keep_content_type: false,
            ..Self::new(Arc::new(store), public_base_url)
        })
    }

    fn url_for(&self, path: &ObjectPath) -> String {
        format!("{}/{}", self.public_base_url, path)
    }

    fn path_for(&self, url: &str) -> Result<ObjectPath, BlobError> {
        let key = url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| BlobError::ForeignUrl(url.to_string()))?;
        ObjectPath::parse(key).map_err(|_| BlobError::ForeignUrl(url.to_string()))
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, BlobError> {
        let path = ObjectPath::from(key);
        let mut attributes = Attributes::new();
        if self.keep_content_type {
            attributes.insert(
                Attribute::ContentType,
                content_type.unwrap_or("application/octet-stream").to_string().into(),
            );
        }
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store.put_opts(&path, bytes.into(), opts).await?;
        tracing::debug!(%path, "Stored blob");
        Ok(self.url_for(&path))
    }

    async fn fetch(&self, url: &str) -> Result<FetchedBlob, BlobError> {
        let path = self.path_for(url)?;
        let result = match self.store.get(&path).await {
            Ok(r) => r,
            Err(object_store::Error::NotFound { .. }) => return Err(BlobError::NotFound(url.to_string())),
            Err(e) => return Err(e.into()),
        };
        // backends without attribute support fall back to the key's extension
        let key: &str = path.as_ref();
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string())
            .or_else(|| mime_guess::from_path(key).first_raw().map(str::to_owned));
        let bytes = result.bytes().await?;

        Ok(FetchedBlob { bytes, content_type })
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let path = self.path_for(url)?;
        self.store.delete(&path).await?;
        Ok(())
    }
}
