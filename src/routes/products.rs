use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use crate::handlers::product::{
    create_download_link, create_product, delete_product, get_product, get_products,
    toggle_availability, update_product,
};
use crate::state::AppState;

pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(get_products).post(create_product))
        .route(
            "/admin/products/{id}",
            get(get_product).post(update_product).delete(delete_product),
        )
        .route("/admin/products/{id}/availability", patch(toggle_availability))
        .route("/admin/products/{id}/download-links", post(create_download_link))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
