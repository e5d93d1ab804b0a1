//! Integration tests for Boutique.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boutique-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_pages` - Home, product grid and detail pages
//! - `storefront_cart` - Session cart and HTMX fragments
//! - `storefront_checkout` - WhatsApp hand-off redirects
//!
//! [`TestApp`] drives the full storefront router in process and keeps the
//! session cookie between requests, like a browser tab would.

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use boutique_storefront::{config::StorefrontConfig, routes, state::AppState};
use tower::ServiceExt;

/// Largest response body the helpers will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Path to the three-product fixture catalog.
#[must_use]
pub fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/products.json")
}

/// The storefront's real static directory.
#[must_use]
pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static")
}

/// Storefront configuration with `catalog` as the catalog source.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
pub fn test_config(catalog: &str) -> StorefrontConfig {
    let static_dir = static_dir().display().to_string();
    StorefrontConfig::from_lookup(|key| match key {
        "CATALOG_SOURCE" => Some(catalog.to_string()),
        "STOREFRONT_STATIC_DIR" => Some(static_dir.clone()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("invalid test configuration: {e}"))
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A header value as text, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// One visitor talking to an in-process storefront.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront backed by the fixture catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(&fixture_catalog().display().to_string())
    }

    /// Storefront backed by `catalog` (a file path or URL).
    #[must_use]
    pub fn with_catalog(catalog: &str) -> Self {
        let state = AppState::new(test_config(catalog));
        Self {
            router: routes::app(state),
            cookie: None,
        }
    }

    /// A second visitor on the same server: shares session storage, not
    /// the cookie.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// `GET uri`.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// `GET uri` as an HTMX request.
    pub async fn get_htmx(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).header("hx-request", "true"), Body::empty())
            .await
    }

    /// `POST uri` with an urlencoded form body.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(request, Body::from(form.to_string())).await
    }

    /// `POST uri` with an urlencoded form body, as an HTMX request.
    pub async fn post_form_htmx(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        self.send(request, Body::from(form.to_string())).await
    }

    /// Add product `id` to the cart the way the product card does.
    pub async fn add_to_cart(&mut self, id: i32) -> TestResponse {
        self.post_form_htmx("/cart/add", &format!("product_id={id}"))
            .await
    }

    /// Current badge count, parsed from the `/cart/count` fragment.
    ///
    /// # Panics
    ///
    /// Panics if the fragment does not contain a number.
    pub async fn cart_count(&mut self) -> u64 {
        let response = self.get_htmx("/cart/count").await;
        let text = response
            .body
            .rsplit_once("\">")
            .and_then(|(_, rest)| rest.split_once("</span>"))
            .map(|(count, _)| count.trim().to_string())
            .unwrap_or_default();
        text.parse()
            .unwrap_or_else(|_| panic!("no count in fragment: {}", response.body))
    }

    async fn send(
        &mut self,
        mut builder: axum::http::request::Builder,
        body: Body,
    ) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(body)
            .unwrap_or_else(|e| panic!("invalid request: {e}"));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split_once(';').map_or(set_cookie, |(pair, _)| pair);
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
