//! The per-visitor cart: session persistence and HTMX fragments.

use axum::http::StatusCode;
use boutique_integration_tests::TestApp;

#[tokio::test]
async fn test_empty_cart() {
    let mut app = TestApp::new();

    assert_eq!(app.cart_count().await, 0);
    let page = app.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("سلتك فارغة"));
}

#[tokio::test]
async fn test_add_merges_and_counts() {
    let mut app = TestApp::new();

    let response = app.add_to_cart(1).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert!(response.body.contains(">1</span>"));

    app.add_to_cart(1).await;
    app.add_to_cart(2).await;
    assert_eq!(app.cart_count().await, 3);

    let page = app.get("/cart").await;
    assert!(page.body.contains("فستان أحمر"));
    assert!(page.body.contains("2x"));
    assert!(page.body.contains("حقيبة جلد"));
    assert!(page.body.contains("1x"));
}

#[tokio::test]
async fn test_cart_survives_reload() {
    let mut app = TestApp::new();
    app.add_to_cart(3).await;

    // Each request restores from the session, like a fresh page load.
    assert_eq!(app.cart_count().await, 1);
    assert_eq!(app.cart_count().await, 1);
    assert!(app.get("/cart").await.body.contains("Silk Scarf"));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let mut first = TestApp::new();
    first.add_to_cart(1).await;

    let mut second = first.new_visitor();
    assert_eq!(second.cart_count().await, 0);
    assert_eq!(first.cart_count().await, 1);
}

#[tokio::test]
async fn test_remove() {
    let mut app = TestApp::new();
    app.add_to_cart(1).await;
    app.add_to_cart(1).await;
    app.add_to_cart(2).await;

    let response = app.post_form_htmx("/cart/remove", "product_id=1").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert!(response.body.contains("id=\"cart-items\""));
    assert!(!response.body.contains("فستان أحمر"));
    assert!(response.body.contains("حقيبة جلد"));

    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_remove_absent_product_is_noop() {
    let mut app = TestApp::new();
    app.add_to_cart(2).await;

    let response = app.post_form_htmx("/cart/remove", "product_id=42").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_clear() {
    let mut app = TestApp::new();
    app.add_to_cart(1).await;
    app.add_to_cart(3).await;

    let response = app.post_form_htmx("/cart/clear", "").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("سلتك فارغة"));
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_plain_form_posts_redirect_to_cart() {
    let mut app = TestApp::new();

    let response = app.post_form("/cart/add", "product_id=2").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
    assert_eq!(app.cart_count().await, 1);

    let response = app.post_form("/cart/clear", "").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let mut app = TestApp::new();

    let response = app.add_to_cart(99).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_add_invalid_id() {
    let mut app = TestApp::new();

    let response = app.post_form_htmx("/cart/add", "product_id=abc").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_with_catalog_unavailable() {
    let mut app = TestApp::with_catalog("/nonexistent/boutique/products.json");

    let response = app.add_to_cart(1).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cart_page_renders_snapshot_price() {
    // The cart page renders the price captured when the item was added.
    let mut app = TestApp::new();
    app.add_to_cart(1).await;

    let page = app.get("/cart").await;
    assert!(page.body.contains("500 ج.م"));
}
