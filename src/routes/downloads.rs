use axum::{routing::get, Router};
use crate::handlers::download::{download_expired, download_product};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products/download/expired", get(download_expired))
        .route("/products/download/{token}", get(download_product))
}
