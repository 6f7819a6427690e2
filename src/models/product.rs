use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
    pub is_available_for_purchase: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row data for a freshly created product. New products start unavailable.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
}

/// Full replacement of the editable columns of a product.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
}
