//! Request-independent logic behind the HTTP handlers.

pub mod downloads;
pub mod products;

/// Cached storefront views that change whenever the catalog does.
pub const CATALOG_VIEWS: [&str; 2] = ["/", "/products"];

/// Where the admin lands after saving a product form.
pub const ADMIN_PRODUCTS_PATH: &str = "/admin/products";

/// Result of a catalog mutation plus the follow-up the caller must perform.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    /// Views whose cached rendering is now stale.
    pub revalidate: &'static [&'static str],
    pub redirect_to: Option<&'static str>,
}

impl<T> Outcome<T> {
    pub fn catalog_changed(value: T) -> Self {
        Self {
            value,
            revalidate: &CATALOG_VIEWS,
            redirect_to: None,
        }
    }

    pub fn redirect(mut self, path: &'static str) -> Self {
        self.redirect_to = Some(path);
        self
    }
}
