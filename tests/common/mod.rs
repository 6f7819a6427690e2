#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use object_store::memory::InMemory;
use tower::ServiceExt;
use uuid::Uuid;

use storefront_backend::config::AppConfig;
use storefront_backend::database::Catalog;
use storefront_backend::error::AppError;
use storefront_backend::models::download_verification::{DownloadGrant, DownloadVerification};
use storefront_backend::models::product::{NewProduct, Product, ProductChanges};
use storefront_backend::routes;
use storefront_backend::state::AppState;
use storefront_backend::storage::{BlobError, BlobStore, FetchedBlob, ObjectBlobStore};

pub const BLOB_BASE: &str = "https://blobs.test";

/// Catalog kept in process memory, counting writes.
#[derive(Default)]
pub struct MemoryCatalog {
    products: Mutex<HashMap<Uuid, Product>>,
    verifications: Mutex<HashMap<Uuid, DownloadVerification>>,
    pub writes: AtomicUsize,
}

impl MemoryCatalog {
    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.products.lock().unwrap().get(&id).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.products.lock().unwrap().len()
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.products.lock().unwrap().values().cloned().collect()
    }

    pub fn seed_product(&self, name: &str, file_path: &str, image_path: &str) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} description"),
            price_in_cents: 1999,
            file_path: file_path.to_string(),
            image_path: image_path.to_string(),
            is_available_for_purchase: false,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().insert(product.id, product.clone());
        product
    }

    pub fn seed_verification(&self, product_id: Uuid, expires_at: DateTime<Utc>) -> Uuid {
        let verification = DownloadVerification {
            id: Uuid::new_v4(),
            expires_at,
            product_id,
            created_at: Utc::now(),
        };
        let id = verification.id;
        self.verifications.lock().unwrap().insert(id, verification);
        id
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let mut products = self.all_products();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.product(id))
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        self.wrote();
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price_in_cents: product.price_in_cents,
            file_path: product.file_path,
            image_path: product.image_path,
            is_available_for_purchase: false,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, changes: ProductChanges) -> Result<Option<Product>, AppError> {
        self.wrote();
        let mut products = self.products.lock().unwrap();
        Ok(products.get_mut(&id).map(|p| {
            p.name = changes.name;
            p.description = changes.description;
            p.price_in_cents = changes.price_in_cents;
            p.file_path = changes.file_path;
            p.image_path = changes.image_path;
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn set_availability(&self, id: Uuid, available: Option<bool>) -> Result<Option<Product>, AppError> {
        self.wrote();
        let mut products = self.products.lock().unwrap();
        Ok(products.get_mut(&id).map(|p| {
            p.is_available_for_purchase = available.unwrap_or(!p.is_available_for_purchase);
            p.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        self.wrote();
        Ok(self.products.lock().unwrap().remove(&id))
    }

    async fn find_download_grant(&self, token: Uuid) -> Result<Option<DownloadGrant>, AppError> {
        let verification = self.verifications.lock().unwrap().get(&token).cloned();
        Ok(verification.and_then(|v| {
            self.product(v.product_id).map(|p| DownloadGrant {
                expires_at: v.expires_at,
                product_name: p.name,
                file_path: p.file_path,
            })
        }))
    }

    async fn create_download_verification(
        &self,
        product_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<DownloadVerification>, AppError> {
        if self.product(product_id).is_none() {
            return Ok(None);
        }
        self.wrote();
        let id = self.seed_verification(product_id, expires_at);
        Ok(self.verifications.lock().unwrap().get(&id).cloned())
    }
}

/// In-memory object store that counts uploads and can be told to fail deletes.
pub struct TestBlobs {
    inner: ObjectBlobStore,
    pub puts: AtomicUsize,
    pub fail_deletes: bool,
}

impl TestBlobs {
    pub fn new(fail_deletes: bool) -> Self {
        Self {
            inner: ObjectBlobStore::new(Arc::new(InMemory::new()), BLOB_BASE),
            puts: AtomicUsize::new(0),
            fail_deletes,
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, key: &str, body: &'static [u8], content_type: Option<&str>) -> String {
        self.inner
            .put(key, Bytes::from_static(body), content_type)
            .await
            .unwrap()
    }

    pub async fn exists(&self, url: &str) -> bool {
        self.inner.fetch(url).await.is_ok()
    }
}

#[async_trait]
impl BlobStore for TestBlobs {
    async fn put(&self, key: &str, bytes: Bytes, content_type: Option<&str>) -> Result<String, BlobError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, bytes, content_type).await
    }

    async fn fetch(&self, url: &str) -> Result<FetchedBlob, BlobError> {
        self.inner.fetch(url).await
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        if self.fail_deletes {
            return Err(BlobError::NotFound(url.to_string()));
        }
        self.inner.delete(url).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<MemoryCatalog>,
    pub blobs: Arc<TestBlobs>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 3000,
        database_url: "postgres://unused".to_string(),
        public_base_url: "https://shop.test".to_string(),
        blob_root: "./target/test-blobs".to_string(),
        blob_public_url: BLOB_BASE.to_string(),
        download_link_ttl: Duration::hours(24),
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

pub fn test_app() -> TestApp {
    build_app(false)
}

pub fn test_app_with_failing_deletes() -> TestApp {
    build_app(true)
}

fn build_app(fail_deletes: bool) -> TestApp {
    let catalog = Arc::new(MemoryCatalog::default());
    let blobs = Arc::new(TestBlobs::new(fail_deletes));
    let state = AppState::new(catalog.clone(), blobs.clone(), test_config());
    TestApp {
        router: routes::app(state),
        catalog,
        blobs,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Hand-assembled `multipart/form-data` body.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "storefront-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, contents: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(contents);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// What a browser sends for a file input left blank.
    pub fn empty_file(self, name: &str) -> Self {
        self.file(name, "", "application/octet-stream", b"")
    }

    pub fn request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn complete_product_form() -> MultipartForm {
    MultipartForm::new()
        .text("name", "Rust Course")
        .text("description", "Twelve hours of video")
        .text("price_in_cents", "4999")
        .file("file", "course.zip", "application/zip", b"PK\x03\x04course")
        .file("image", "cover.png", "image/png", b"\x89PNGcover")
}
