use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error as SqlxError, PgPool};
use tracing::error;
use uuid::Uuid;

use super::Catalog;
use crate::error::AppError;
use crate::models::download_verification::{DownloadGrant, DownloadVerification};
use crate::models::product::{NewProduct, Product, ProductChanges};

const PRODUCT_COLUMNS: &str = "id, name, description, price_in_cents, file_path, image_path,
                               is_available_for_purchase, created_at, updated_at";

pub async fn create_pool(database_url: &str) -> Result<PgPool, SqlxError> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &SqlxError) -> bool {
    matches!(err, SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23503"))
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name");
        sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to fetch products");
                e.into()
            })
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (id, name, description, price_in_cents, file_path, image_path,
                                   is_available_for_purchase)
             VALUES ($1, $2, $3, $4, $5, $6, FALSE)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(Uuid::new_v4())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_in_cents)
            .bind(&product.file_path)
            .bind(&product.image_path)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET
             name = $1,
             description = $2,
             price_in_cents = $3,
             file_path = $4,
             image_path = $5,
             updated_at = NOW()
             WHERE id = $6 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.price_in_cents)
            .bind(&changes.file_path)
            .bind(&changes.image_path)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn set_availability(&self, id: Uuid, available: Option<bool>) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET
             is_available_for_purchase = COALESCE($1, NOT is_available_for_purchase),
             updated_at = NOW()
             WHERE id = $2 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(available)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find_download_grant(&self, token: Uuid) -> Result<Option<DownloadGrant>, AppError> {
        let grant = sqlx::query_as::<_, DownloadGrant>(
            "SELECT dv.expires_at, p.name AS product_name, p.file_path
             FROM download_verifications dv
             JOIN products p ON p.id = dv.product_id
             WHERE dv.id = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(grant)
    }

    async fn create_download_verification(
        &self,
        product_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<DownloadVerification>, AppError> {
        let result = sqlx::query_as::<_, DownloadVerification>(
            "INSERT INTO download_verifications (id, product_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, expires_at, product_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(product_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(verification) => Ok(Some(verification)),
            Err(e) if is_foreign_key_violation(&e) => Ok(None),
            Err(e) => Err(AppError::db(e)),
        }
    }
}
