use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The slice of an order that a purchase receipt shows.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub price_paid_in_cents: i32,
}
