// src/handlers/email.rs
use axum::{extract::State, response::Html};

use crate::email::purchase_receipt::{self, PurchaseReceipt};
use crate::state::AppState;

// GET /dev/email/purchase-receipt - Render the receipt template with sample data
pub async fn preview_purchase_receipt(State(state): State<AppState>) -> Html<String> {
    let receipt = PurchaseReceipt::preview(&state.config.public_base_url);
    Html(purchase_receipt::render(&receipt))
}
