//! Product catalog loading and queries.
//!
//! The catalog is a static JSON document (an array of products) fetched
//! either over HTTP or from a local file. It is loaded once per page render
//! with no caching and no retry: a failure simply renders the page's
//! empty/error state.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use boutique_core::{Category, CategoryFilter, Product, ProductId};
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::instrument;
use url::Url;

/// Catalog could not be loaded (`CatalogUnavailable`).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the catalog file failed.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not a JSON array of products.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A product record has a non-positive id.
    #[error("product {0} has an invalid id")]
    InvalidProductId(ProductId),

    /// Two product records share an id.
    #[error("duplicate product id {0}")]
    DuplicateProductId(ProductId),
}

/// A requested product id is not in the catalog.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("product {0} not found")]
pub struct ProductNotFound(pub ProductId);

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched with a plain HTTP GET.
    Http(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl FromStr for CatalogSource {
    type Err = url::ParseError;

    /// `http://` and `https://` values are URLs; anything else is a path.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Url::parse(value).map(Self::Http)
        } else {
            Ok(Self::File(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the catalog document.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    /// Create a loader for `source`.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    /// The configured source.
    #[must_use]
    pub const fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Fetch and validate the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the document cannot be fetched or read,
    /// is not a JSON array of products, or contains invalid or duplicate ids.
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        let products: Vec<Product> = match &self.source {
            CatalogSource::Http(url) => {
                self.client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?
            }
            CatalogSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?;
                serde_json::from_slice(&bytes)?
            }
        };

        let catalog = Catalog::from_products(products)?;
        tracing::debug!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }
}

/// Product grid query: category filter AND free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: CategoryFilter,
    pub search: String,
}

impl CatalogQuery {
    /// Whether `product` passes both the category filter and the search.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(&product.category) && product.matches_search(&self.search)
    }
}

/// The read-only product list for one page load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking that every id is positive and unique.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProductId`] or
    /// [`CatalogError::DuplicateProductId`].
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !product.id.is_valid() {
                return Err(CatalogError::InvalidProductId(product.id));
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProductId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// All products in document order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ProductNotFound`] if no product has that id.
    pub fn find(&self, id: ProductId) -> Result<&Product, ProductNotFound> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(ProductNotFound(id))
    }

    /// Products matching `query`, in document order.
    #[must_use]
    pub fn filter(&self, query: &CatalogQuery) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| query.matches(product))
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&Category> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| &product.category)
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// A random sample of up to `count` products for the home page.
    pub fn featured<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Product> {
        let mut picks: Vec<&Product> = self.products.iter().collect();
        picks.shuffle(rng);
        picks.truncate(count);
        picks
    }
}
