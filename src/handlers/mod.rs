pub mod download;
pub mod email;
pub mod product;

use http::{HeaderName, HeaderValue};

/// Response header listing the cached views a mutation made stale.
pub const REVALIDATE_HEADER: HeaderName = HeaderName::from_static("x-revalidate");

pub(crate) fn revalidate_header(paths: &[&str]) -> [(HeaderName, HeaderValue); 1] {
    let value = HeaderValue::from_str(&paths.join(","))
        .unwrap_or_else(|_| HeaderValue::from_static("/"));
    [(REVALIDATE_HEADER, value)]
}
