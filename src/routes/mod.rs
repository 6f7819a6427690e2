pub mod downloads;
pub mod emails;
pub mod products;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(products::routes(max_upload_bytes))
        .merge(downloads::routes())
        .merge(emails::routes())
}

/// Full application: API routes, liveness endpoints, locally stored blobs
/// and middleware.
pub fn app(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let blob_dir = ServeDir::new(&state.config.blob_root);
    create_router(max_upload_bytes)
        .route("/", get(|| async { "Storefront API" }))
        .route("/health", get(health_check))
        .nest_service("/blobs", blob_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
