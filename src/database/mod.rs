//! Persistence for products and download verifications.

mod postgres;

pub use postgres::{create_pool, PgCatalog};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::download_verification::{DownloadGrant, DownloadVerification};
use crate::models::product::{NewProduct, Product, ProductChanges};

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError>;

    /// `None` when no product has this id.
    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, AppError>;

    /// Sets the availability flag, or flips it when `available` is `None`.
    async fn set_availability(&self, id: Uuid, available: Option<bool>) -> Result<Option<Product>, AppError>;

    /// Returns the deleted row so its blobs can be cleaned up.
    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    /// Looks a token up regardless of expiry; callers check `expires_at`.
    async fn find_download_grant(&self, token: Uuid) -> Result<Option<DownloadGrant>, AppError>;

    /// `None` when the product does not exist.
    async fn create_download_verification(
        &self,
        product_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<DownloadVerification>, AppError>;
}
