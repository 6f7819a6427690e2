use axum::{routing::get, Router};
use crate::handlers::email::preview_purchase_receipt;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dev/email/purchase-receipt", get(preview_purchase_receipt))
}
