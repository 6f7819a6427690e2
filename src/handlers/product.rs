// src/handlers/product.rs
use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use super::revalidate_header;
use crate::dtos::product::{
    AvailabilityRequest, DownloadLinkResponse, ProductFormData, ProductResponse, UploadedFile,
};
use crate::error::AppError;
use crate::models::product::Product;
use crate::services::{downloads, products, Outcome};
use crate::state::AppState;

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed form field: {e}")))
}

async fn read_upload(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed upload: {e}")))?;

    Ok(UploadedFile {
        file_name,
        content_type,
        bytes,
    })
}

/// Collects the product form fields; unknown fields are ignored.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductFormData, AppError> {
    let mut form = ProductFormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "price_in_cents" => form.price_in_cents = Some(read_text(field).await?),
            "file" => form.file = Some(read_upload(field).await?),
            "image" => form.image = Some(read_upload(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Malformed ids cannot name a product, so they are reported like unknown ones.
fn parse_product_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::not_found("Product not found"))
}

/// Redirects when the mutation asks for it, otherwise returns the product.
/// Either way the revalidation signal rides along as a header.
fn saved(outcome: Outcome<Product>) -> Response {
    let headers = revalidate_header(outcome.revalidate);
    match outcome.redirect_to {
        Some(path) => (headers, Redirect::to(path)).into_response(),
        None => (headers, Json(ProductResponse::from(outcome.value))).into_response(),
    }
}

// GET /admin/products - List all products
#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// GET /admin/products/:id - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = parse_product_id(&id)?;
    let product = state
        .catalog
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /admin/products - Create new product from a multipart form
#[instrument(skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_product_form(multipart).await?;
    let outcome = products::create_product(state.catalog.as_ref(), state.blobs.as_ref(), form).await?;
    Ok(saved(outcome))
}

// POST /admin/products/:id - Update product from a multipart form
#[instrument(skip(state, multipart))]
pub async fn update_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let id = parse_product_id(&id)?;
    let form = read_product_form(multipart).await?;
    let outcome =
        products::update_product(state.catalog.as_ref(), state.blobs.as_ref(), id, form).await?;
    Ok(saved(outcome))
}

// PATCH /admin/products/:id/availability - Set or flip availability
#[instrument(skip(state, payload))]
pub async fn toggle_availability(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Option<Json<AvailabilityRequest>>,
) -> Result<Response, AppError> {
    let id = parse_product_id(&id)?;
    let available = payload.and_then(|Json(p)| p.is_available_for_purchase);
    let outcome = products::set_availability(state.catalog.as_ref(), id, available).await?;
    Ok(saved(outcome))
}

// DELETE /admin/products/:id - Delete product and, best-effort, its blobs
#[instrument(skip(state))]
pub async fn delete_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let id = parse_product_id(&id)?;
    let outcome = products::delete_product(state.catalog.as_ref(), state.blobs.as_ref(), id).await?;
    Ok((StatusCode::NO_CONTENT, revalidate_header(outcome.revalidate)).into_response())
}

// POST /admin/products/:id/download-links - Issue a download verification
#[instrument(skip(state))]
pub async fn create_download_link(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<DownloadLinkResponse>), AppError> {
    let id = parse_product_id(&id)?;
    let verification =
        downloads::issue_download_link(state.catalog.as_ref(), &state.config, id, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(DownloadLinkResponse {
            token: verification.id,
            expires_at: verification.expires_at,
            url: state.config.download_url(&verification.id.to_string()),
        }),
    ))
}
