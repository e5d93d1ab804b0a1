//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Random sample of catalog products.
    pub featured_products: Vec<ProductView>,
    /// The catalog failed to load; the section shows a notice instead.
    pub catalog_unavailable: bool,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = match state.catalog().load().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load catalog for home page: {e}");
            return HomeTemplate {
                featured_products: Vec::new(),
                catalog_unavailable: true,
            };
        }
    };

    let featured_products = catalog
        .featured(state.config().featured_count, &mut rand::rng())
        .into_iter()
        .map(|product| ProductView::card(product, state.currency_label()))
        .collect();

    HomeTemplate {
        featured_products,
        catalog_unavailable: false,
    }
}
