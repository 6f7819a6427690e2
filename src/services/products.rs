use tracing::{info, warn};
use uuid::Uuid;

use super::{Outcome, ADMIN_PRODUCTS_PATH};
use crate::database::Catalog;
use crate::dtos::product::{ProductFormData, UploadedFile};
use crate::error::AppError;
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::storage::{new_blob_key, BlobKind, BlobStore};
use crate::validation::{validate_new_product, validate_product_edit};

async fn upload(blobs: &dyn BlobStore, kind: BlobKind, file: UploadedFile) -> Result<String, AppError> {
    let key = new_blob_key(kind, &file.file_name);
    let url = blobs
        .put(&key, file.bytes, file.content_type.as_deref())
        .await?;
    Ok(url)
}

/// Validates the form, uploads both blobs and inserts an unavailable product.
pub async fn create_product(
    catalog: &dyn Catalog,
    blobs: &dyn BlobStore,
    form: ProductFormData,
) -> Result<Outcome<Product>, AppError> {
    let form = validate_new_product(form).map_err(AppError::validation)?;
    let (Some(file), Some(image)) = (form.file, form.image) else {
        return Err(AppError::internal("validated product form lost its uploads"));
    };

    let file_path = upload(blobs, BlobKind::File, file).await?;
    let image_path = upload(blobs, BlobKind::Image, image).await?;

    let product = catalog
        .insert_product(NewProduct {
            name: form.name,
            description: form.description,
            price_in_cents: form.price_in_cents,
            file_path,
            image_path,
        })
        .await?;

    let outcome = Outcome::catalog_changed(product).redirect(ADMIN_PRODUCTS_PATH);
    info!(id = %outcome.value.id, name = %outcome.value.name, revalidate = ?outcome.revalidate, "Product created");
    Ok(outcome)
}

/// Replaces the text fields and, when a non-empty upload is given, the file
/// or image. Previous blobs are left in place.
pub async fn update_product(
    catalog: &dyn Catalog,
    blobs: &dyn BlobStore,
    id: Uuid,
    form: ProductFormData,
) -> Result<Outcome<Product>, AppError> {
    let form = validate_product_edit(form).map_err(AppError::validation)?;
    let existing = catalog
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let file_path = match form.file {
        Some(file) => upload(blobs, BlobKind::File, file).await?,
        None => existing.file_path,
    };
    let image_path = match form.image {
        Some(image) => upload(blobs, BlobKind::Image, image).await?,
        None => existing.image_path,
    };

    let product = catalog
        .update_product(
            id,
            ProductChanges {
                name: form.name,
                description: form.description,
                price_in_cents: form.price_in_cents,
                file_path,
                image_path,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let outcome = Outcome::catalog_changed(product).redirect(ADMIN_PRODUCTS_PATH);
    info!(id = %outcome.value.id, revalidate = ?outcome.revalidate, "Product updated");
    Ok(outcome)
}

pub async fn set_availability(
    catalog: &dyn Catalog,
    id: Uuid,
    available: Option<bool>,
) -> Result<Outcome<Product>, AppError> {
    let product = catalog
        .set_availability(id, available)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let outcome = Outcome::catalog_changed(product);
    info!(
        id = %outcome.value.id,
        available = outcome.value.is_available_for_purchase,
        revalidate = ?outcome.revalidate,
        "Product availability changed"
    );
    Ok(outcome)
}

/// Deletes the row, then tries to delete both blobs. Blob failures are
/// logged and otherwise ignored; the row stays deleted.
pub async fn delete_product(
    catalog: &dyn Catalog,
    blobs: &dyn BlobStore,
    id: Uuid,
) -> Result<Outcome<Product>, AppError> {
    let product = catalog
        .delete_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    for url in [&product.file_path, &product.image_path] {
        if let Err(e) = blobs.delete(url).await {
            warn!(id = %product.id, %url, error = %e, "Failed to delete product blob");
        }
    }

    let outcome = Outcome::catalog_changed(product);
    info!(id = %outcome.value.id, revalidate = ?outcome.revalidate, "Product deleted");
    Ok(outcome)
}
