//! Catalog products.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product category label, e.g. `"فساتين"`.
///
/// Categories come from a small fixed set chosen by whoever authors the
/// catalog; the storefront derives the set from the loaded products rather
/// than hard-coding it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category selection for the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Exactly one category.
    Only(Category),
}

impl CategoryFilter {
    /// Labels accepted as "every category": the English keyword and the
    /// storefront's Arabic button label.
    pub const ALL_LABELS: [&'static str; 2] = ["all", "الكل"];

    /// Parse a filter from a query-string value.
    ///
    /// Blank input and any of [`Self::ALL_LABELS`] select every category.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty()
            || Self::ALL_LABELS
                .iter()
                .any(|label| value.eq_ignore_ascii_case(label))
        {
            Self::All
        } else {
            Self::Only(Category::new(value))
        }
    }

    /// Whether `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    /// The query-string value for this filter.
    #[must_use]
    pub fn as_query_value(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }
}

/// A purchasable product as published in the catalog document.
///
/// Products are immutable for the lifetime of a page load. The cart stores
/// its own by-value snapshot, so later catalog edits never rewrite a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Longer copy for the detail page, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub category: Category,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Product {
    /// Text for the detail page: the long description when present.
    #[must_use]
    pub fn detail_description(&self) -> &str {
        self.long_description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(&self.description)
    }

    /// Case-insensitive substring match over title and description.
    ///
    /// An empty (or whitespace-only) term matches every product.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn dress() -> Product {
        Product {
            id: ProductId::new(7),
            title: "Dress A".to_string(),
            description: "Hand-embroidered Toob".to_string(),
            long_description: None,
            category: Category::new("فساتين"),
            price: Price::new(Decimal::from(1500)),
            image: None,
        }
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": 3,
            "title": "ثوب سوداني",
            "description": "قطن",
            "longDescription": "قطن مصري مطرز يدوياً",
            "category": "أثواب",
            "price": 2200,
            "image": "images/toob.jpg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.category.as_str(), "أثواب");
        assert_eq!(product.price.amount(), Decimal::from(2200));
        assert_eq!(product.detail_description(), "قطن مصري مطرز يدوياً");
        assert_eq!(product.image.as_deref(), Some("images/toob.jpg"));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"id": 1, "title": "Scarf", "category": "x", "price": 10}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert!(product.long_description.is_none());
        assert!(product.image.is_none());
    }

    #[test]
    fn test_detail_description_falls_back() {
        let mut product = dress();
        assert_eq!(product.detail_description(), "Hand-embroidered Toob");
        product.long_description = Some("  ".to_string());
        assert_eq!(product.detail_description(), "Hand-embroidered Toob");
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let product = dress();
        assert!(product.matches_search("dress"));
        assert!(product.matches_search("TOOB"));
        assert!(product.matches_search(""));
        assert!(!product.matches_search("jacket"));
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("ALL"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("الكل"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("فساتين"),
            CategoryFilter::Only(Category::new("فساتين"))
        );
    }

    #[test]
    fn test_category_filter_matches() {
        let dresses = Category::new("فساتين");
        assert!(CategoryFilter::All.matches(&dresses));
        assert!(CategoryFilter::Only(dresses.clone()).matches(&dresses));
        assert!(!CategoryFilter::Only(Category::new("أثواب")).matches(&dresses));
    }
}
