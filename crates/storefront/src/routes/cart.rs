//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each request restores the visitor's cart from the session `cart` slot,
//! applies the operation through a [`CartStore`], and flushes the slot back.
//! Mutations answer HTMX requests with a fragment plus an
//! `HX-Trigger: cart-updated` header; plain form posts redirect to `/cart`.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use boutique_core::{Cart, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CART_KEY, CartStore, SessionSnapshot};
use crate::checkout::CheckoutError;
use crate::error::AppError;
use crate::filters;
use crate::routes::products::{find_product, parse_product_id};
use crate::state::AppState;

/// Event name the page listens for to refresh the badge and cart panel.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
}

impl CartView {
    /// Build the view, rendering prices with `currency_label`.
    #[must_use]
    pub fn new(cart: &Cart, currency_label: &str) -> Self {
        Self {
            items: cart
                .entries()
                .iter()
                .map(|entry| CartItemView {
                    id: entry.product.id.as_i32(),
                    title: entry.product.title.clone(),
                    quantity: entry.quantity,
                    price: entry.product.price.display_with(currency_label),
                    image: entry.product.image.clone(),
                })
                .collect(),
            item_count: cart.total_item_count(),
        }
    }
}

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartProductForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Restore the visitor's cart from the session.
async fn open_cart(session: &Session) -> Result<CartStore<SessionSnapshot>, AppError> {
    let snapshot = SessionSnapshot::load(session, &[CART_KEY]).await?;
    Ok(CartStore::restore(snapshot))
}

/// Run one cart operation and write the result back to the session.
///
/// Returns the updated cart and whether the change listener fired.
async fn mutate_cart(
    session: &Session,
    op: impl FnOnce(&mut CartStore<SessionSnapshot>) + Send,
) -> Result<(Cart, bool), AppError> {
    let mut store = open_cart(session).await?;

    let changed = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&changed);
    store.on_change(move |change, cart| {
        tracing::debug!(?change, items = cart.total_item_count(), "Cart changed");
        flag.store(true, Ordering::Relaxed);
    });

    op(&mut store);

    let cart = store.cart().clone();
    store.into_storage().flush(session).await?;
    Ok((cart, changed.load(Ordering::Relaxed)))
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.get(HX_REQUEST).is_some_and(|v| v == "true")
}

/// Attach the refresh trigger when the cart actually changed.
fn with_trigger(mut response: Response, changed: bool) -> Response {
    if changed {
        response
            .headers_mut()
            .insert(HX_TRIGGER, HeaderValue::from_static(CART_UPDATED_EVENT));
    }
    response
}

fn form_product_id(form: &CartProductForm) -> Result<ProductId, AppError> {
    parse_product_id(Some(&form.product_id))
        .ok_or_else(|| AppError::BadRequest(format!("invalid product id: {}", form.product_id)))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let store = open_cart(&session).await?;
    Ok(CartShowTemplate {
        cart: CartView::new(store.cart(), state.currency_label()),
    })
}

/// Add one unit of a product to the cart.
///
/// HTMX requests get the updated count badge.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response, AppError> {
    let id = form_product_id(&form)?;
    let product = find_product(&state, id).await?;
    let (cart, changed) = mutate_cart(&session, |store| store.add(&product)).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let badge = CartCountTemplate {
        count: cart.total_item_count(),
    };
    Ok(with_trigger(badge.into_response(), changed))
}

/// Remove a product's entry from the cart.
///
/// HTMX requests get the re-rendered cart items.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response, AppError> {
    let id = form_product_id(&form)?;
    let (cart, changed) = mutate_cart(&session, |store| store.remove(id)).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let items = CartItemsTemplate {
        cart: CartView::new(&cart, state.currency_label()),
    };
    Ok(with_trigger(items.into_response(), changed))
}

/// Empty the cart.
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (cart, changed) = mutate_cart(&session, CartStore::clear).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }
    let items = CartItemsTemplate {
        cart: CartView::new(&cart, state.currency_label()),
    };
    Ok(with_trigger(items.into_response(), changed))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse, AppError> {
    let store = open_cart(&session).await?;
    Ok(CartCountTemplate {
        count: store.total_item_count(),
    })
}

/// Redirect to the WhatsApp hand-off for the whole cart.
///
/// An empty cart goes back to the cart page. The cart is left intact.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect, AppError> {
    let store = open_cart(&session).await?;

    match state.checkout().cart_order_url(store.cart()) {
        Ok(url) => {
            tracing::info!(items = store.total_item_count(), "Cart order handed off");
            Ok(Redirect::to(&url))
        }
        Err(CheckoutError::EmptyCart) => Ok(Redirect::to("/cart")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{Category, Price, Product};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("منتج {id}"),
            description: String::new(),
            long_description: None,
            category: Category::new("عطور"),
            price: Price::new(Decimal::new(price, 0)),
            image: None,
        }
    }

    #[test]
    fn test_cart_view() {
        let mut cart = Cart::new();
        cart.add(&product(1, 850));
        cart.add(&product(1, 850));
        cart.add(&product(2, 120));

        let view = CartView::new(&cart, "ج.م");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.items[0].price, "850 ج.م");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_trigger_only_on_change() {
        let response = with_trigger(().into_response(), false);
        assert!(response.headers().get(HX_TRIGGER).is_none());

        let response = with_trigger(().into_response(), true);
        assert_eq!(
            response.headers().get(HX_TRIGGER).unwrap(),
            CART_UPDATED_EVENT
        );
    }
}
