// src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Catalog;
use crate::storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, blobs: Arc<dyn BlobStore>, config: AppConfig) -> Self {
        Self {
            catalog,
            blobs,
            config: Arc::new(config),
        }
    }
}
