// src/dtos/product.rs
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A file part of a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// An untouched file input is submitted as a zero-byte part.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"))
    }
}

/// Product form as submitted, before validation. Every field may be absent.
#[derive(Debug, Clone, Default)]
pub struct ProductFormData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_in_cents: Option<String>,
    pub file: Option<UploadedFile>,
    pub image: Option<UploadedFile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityRequest {
    /// Target value; when omitted the current flag is flipped.
    pub is_available_for_purchase: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_in_cents: i32,
    pub file_path: String,
    pub image_path: String,
    pub is_available_for_purchase: bool,
    pub created_at: String,
    pub updated_at: String,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price_in_cents: product.price_in_cents,
            file_path: product.file_path,
            image_path: product.image_path,
            is_available_for_purchase: product.is_available_for_purchase,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadLinkResponse {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub url: String,
}
