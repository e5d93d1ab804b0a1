//! Product route handlers.
//!
//! The detail page and single-product order link select the product with a
//! `?id=<int>` query parameter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use boutique_core::{CategoryFilter, Product, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::CatalogQuery;
use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Label of the "every category" filter button.
const ALL_CATEGORIES_LABEL: &str = "الكل";

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
}

impl ProductView {
    /// Grid card: short description.
    #[must_use]
    pub fn card(product: &Product, currency_label: &str) -> Self {
        Self::with_description(product, &product.description, currency_label)
    }

    /// Detail page: long description when the catalog has one.
    #[must_use]
    pub fn detail(product: &Product, currency_label: &str) -> Self {
        Self::with_description(product, product.detail_description(), currency_label)
    }

    fn with_description(product: &Product, description: &str, currency_label: &str) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            description: description.to_string(),
            category: product.category.to_string(),
            price: product.price.display_with(currency_label),
            image: product.image.clone(),
        }
    }
}

/// Category filter button.
#[derive(Clone)]
pub struct CategoryButton {
    pub label: String,
    pub href: String,
    pub active: bool,
}

impl CategoryButton {
    /// A button linking to the grid filtered by `filter`, keeping `search`.
    fn new(label: &str, filter: &CategoryFilter, current: &CategoryFilter, search: &str) -> Self {
        let mut href = format!(
            "/products?category={}",
            urlencoding::encode(filter.as_query_value())
        );
        if !search.is_empty() {
            href.push_str("&q=");
            href.push_str(&urlencoding::encode(search));
        }
        Self {
            label: label.to_string(),
            href,
            active: filter == current,
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// `?id=` query parameter. Kept as text so a malformed id renders the
/// not-found view instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ProductIdQuery {
    pub id: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryButton>,
    /// Query value of the active category, kept by the search form.
    pub category: String,
    pub search: String,
    pub catalog_unavailable: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Product not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub requested: Option<i32>,
}

/// Parse a navigation id. Missing, non-numeric and non-positive ids are
/// all "no such product".
#[must_use]
pub fn parse_product_id(raw: Option<&str>) -> Option<ProductId> {
    raw?.parse::<ProductId>().ok().filter(ProductId::is_valid)
}

/// Load the catalog and take a copy of one product.
///
/// # Errors
///
/// Returns [`AppError::CatalogUnavailable`] or [`AppError::ProductNotFound`].
pub async fn find_product(state: &AppState, id: ProductId) -> Result<Product, AppError> {
    let catalog = state.catalog().load().await?;
    Ok(catalog.find(id)?.clone())
}

/// Display product listing page, filtered by category and search term.
///
/// A catalog failure renders the page's empty state rather than an error.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> impl IntoResponse {
    let filter = CategoryFilter::parse(query.category.as_deref().unwrap_or_default());
    let search = query.q.unwrap_or_default();

    let catalog = match state.catalog().load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog unavailable for product listing");
            return ProductsIndexTemplate {
                products: Vec::new(),
                categories: Vec::new(),
                category: filter.as_query_value().to_string(),
                search,
                catalog_unavailable: true,
            };
        }
    };

    let mut categories = vec![CategoryButton::new(
        ALL_CATEGORIES_LABEL,
        &CategoryFilter::All,
        &filter,
        &search,
    )];
    categories.extend(catalog.categories().into_iter().map(|category| {
        let only = CategoryFilter::Only(category.clone());
        CategoryButton::new(category.as_str(), &only, &filter, &search)
    }));

    let category = filter.as_query_value().to_string();
    let query = CatalogQuery {
        category: filter,
        search,
    };
    let products = catalog
        .filter(&query)
        .into_iter()
        .map(|product| ProductView::card(product, state.currency_label()))
        .collect();

    ProductsIndexTemplate {
        products,
        categories,
        category,
        search: query.search,
        catalog_unavailable: false,
    }
}

/// Display product detail page.
///
/// Unknown ids render the not-found view (404); an unavailable catalog
/// renders the same view with 503.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<ProductIdQuery>,
) -> Response {
    let Some(id) = parse_product_id(query.id.as_deref()) else {
        return not_found(StatusCode::NOT_FOUND, None);
    };

    match find_product(&state, id).await {
        Ok(product) => ProductShowTemplate {
            product: ProductView::detail(&product, state.currency_label()),
        }
        .into_response(),
        Err(AppError::ProductNotFound(_)) => not_found(StatusCode::NOT_FOUND, Some(id)),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Catalog unavailable for product detail");
            not_found(StatusCode::SERVICE_UNAVAILABLE, Some(id))
        }
    }
}

/// Redirect to the WhatsApp hand-off for a single product.
#[instrument(skip(state))]
pub async fn order(
    State(state): State<AppState>,
    Query(query): Query<ProductIdQuery>,
) -> Response {
    let Some(id) = parse_product_id(query.id.as_deref()) else {
        return not_found(StatusCode::NOT_FOUND, None);
    };

    match find_product(&state, id).await {
        Ok(product) => {
            tracing::info!(product_id = %id, "Single-product order handed off");
            Redirect::to(&state.checkout().product_order_url(&product)).into_response()
        }
        Err(AppError::ProductNotFound(_)) => not_found(StatusCode::NOT_FOUND, Some(id)),
        Err(e) => e.into_response(),
    }
}

fn not_found(status: StatusCode, id: Option<ProductId>) -> Response {
    (
        status,
        ProductNotFoundTemplate {
            requested: id.map(|id| id.as_i32()),
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_button_href() {
        let only = CategoryFilter::Only(boutique_core::Category::new("عطور"));
        let button = CategoryButton::new("عطور", &only, &only, "مسك");
        assert!(button.active);
        assert_eq!(
            button.href,
            format!(
                "/products?category={}&q={}",
                urlencoding::encode("عطور"),
                urlencoding::encode("مسك")
            )
        );

        let all = CategoryButton::new(ALL_CATEGORIES_LABEL, &CategoryFilter::All, &only, "");
        assert!(!all.active);
        assert_eq!(all.href, "/products?category=all");
    }

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id(Some("7")), Some(ProductId::new(7)));
        assert_eq!(parse_product_id(Some("0")), None);
        assert_eq!(parse_product_id(Some("-2")), None);
        assert_eq!(parse_product_id(Some("abc")), None);
        assert_eq!(parse_product_id(None), None);
    }
}
