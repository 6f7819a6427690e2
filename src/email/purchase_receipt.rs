//! Purchase receipt email.
//!
//! Rendering is a pure function of the order, the product bought and the
//! download token; the result is a complete HTML document ready to hand to a
//! mail transport.

use chrono::Utc;
use uuid::Uuid;

use super::{escape_html, format_usd};
use crate::models::order::Order;
use crate::models::product::Product;

pub const SUBJECT: &str = "Order Confirmation";

#[derive(Debug, Clone)]
pub struct ReceiptProduct {
    pub name: String,
    pub image_path: String,
    pub description: String,
}

impl From<&Product> for ReceiptProduct {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            image_path: product.image_path.clone(),
            description: product.description.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub product: ReceiptProduct,
    pub order: Order,
    pub download_verification_id: String,
    /// Storefront origin, e.g. `https://shop.example.com`.
    pub base_url: String,
}

impl PurchaseReceipt {
    /// Sample data for previewing the template.
    pub fn preview(base_url: &str) -> Self {
        Self {
            product: ReceiptProduct {
                name: "Product name".to_string(),
                description: "Some description".to_string(),
                image_path: format!("{base_url}/products/sample-cover.jpg"),
            },
            order: Order {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                price_paid_in_cents: 10000,
            },
            download_verification_id: Uuid::new_v4().to_string(),
            base_url: base_url.to_string(),
        }
    }

    pub fn download_url(&self) -> String {
        format!(
            "{}/products/download/{}",
            self.base_url.trim_end_matches('/'),
            self.download_verification_id
        )
    }
}

pub fn render(receipt: &PurchaseReceipt) -> String {
    let product = &receipt.product;
    let order = &receipt.order;
    let name = escape_html(&product.name);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{subject}</title>
</head>
<body style="font-family: sans-serif; background-color: #ffffff;">
<div style="display: none; max-height: 0; overflow: hidden;">Download {name} and view receipt</div>
<div style="max-width: 36rem; margin: 0 auto; padding: 1rem;">
<h1 style="font-size: 1.125rem; margin-bottom: 1rem;">Purchase Receipt</h1>
<table role="presentation" width="100%">
<tr>
<td><p style="color: #6b7280; margin: 0;">Order ID</p><p style="margin: 0;">{order_id}</p></td>
<td><p style="color: #6b7280; margin: 0;">Purchased On</p><p style="margin: 0;">{purchased_on}</p></td>
<td><p style="color: #6b7280; margin: 0;">Price Paid</p><p style="margin: 0;">{price_paid}</p></td>
</tr>
</table>
<div style="border: 1px solid #d1d5db; border-radius: 0.5rem; padding: 1rem; margin-top: 1rem;">
<img src="{image_src}" alt="{name}" width="100%" style="border-radius: 0.25rem;">
<h2 style="font-size: 1rem; margin: 1rem 0 0.5rem;">{name}</h2>
<p style="color: #4b5563; margin: 0 0 1rem;">{description}</p>
<a href="{download_url}" style="display: inline-block; background-color: #000000; color: #ffffff; padding: 0.75rem 1.5rem; border-radius: 0.375rem; text-decoration: none;">Download</a>
</div>
</div>
</body>
</html>
"#,
        subject = SUBJECT,
        order_id = escape_html(&order.id.to_string()),
        purchased_on = order.created_at.format("%b %-d, %Y"),
        price_paid = format_usd(order.price_paid_in_cents),
        image_src = escape_html(&product.image_path),
        description = escape_html(&product.description),
        download_url = escape_html(&receipt.download_url()),
    )
}
