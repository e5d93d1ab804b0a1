//! Checkout hand-off to WhatsApp.
//!
//! There is no payment flow: an order is a pre-filled chat message to the
//! shop's number, opened via `https://wa.me/<phone>?text=<message>`. Every
//! function here is pure; the caller decides how to open the URL.

use boutique_core::{Cart, Email, Product};
use thiserror::Error;

use crate::config::CheckoutConfig;

const HANDOFF_BASE: &str = "https://wa.me";

const CART_GREETING: &str = "مرحباً، أريد طلب المنتجات التالية:";
const PRODUCT_GREETING: &str = "مرحباً، أريد طلب";

/// Errors building a hand-off URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,
}

/// A message from the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
}

/// Formats order messages and wraps them in hand-off URLs.
#[derive(Debug, Clone)]
pub struct CheckoutRedirector {
    phone: String,
}

impl CheckoutRedirector {
    /// Create a redirector for the configured shop number.
    #[must_use]
    pub fn new(config: &CheckoutConfig) -> Self {
        Self {
            phone: config.phone.clone(),
        }
    }

    /// The order summary for a cart: a greeting, then one
    /// `- <title> (<qty>x)` line per entry in cart order.
    #[must_use]
    pub fn cart_message(cart: &Cart) -> String {
        let lines: Vec<String> = cart
            .entries()
            .iter()
            .map(|entry| format!("- {} ({}x)", entry.product.title, entry.quantity))
            .collect();
        format!("{CART_GREETING}\n{}", lines.join("\n"))
    }

    /// Hand-off URL ordering everything in `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no entries.
    pub fn cart_order_url(&self, cart: &Cart) -> Result<String, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(self.handoff_url(&Self::cart_message(cart)))
    }

    /// Hand-off URL ordering a single product.
    #[must_use]
    pub fn product_order_url(&self, product: &Product) -> String {
        self.handoff_url(&format!("{PRODUCT_GREETING} {}", product.title))
    }

    /// Hand-off URL carrying a contact-form message.
    #[must_use]
    pub fn contact_url(&self, contact: &ContactMessage) -> String {
        let phone_line = contact
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(|phone| format!("الهاتف: {phone}\n"))
            .unwrap_or_default();

        let message = format!(
            "مرحباً، اسمي {}\nالإيميل: {}\n{phone_line}الرسالة: {}",
            contact.name.trim(),
            contact.email,
            contact.message.trim()
        );
        self.handoff_url(&message)
    }

    fn handoff_url(&self, message: &str) -> String {
        format!(
            "{HANDOFF_BASE}/{}?text={}",
            self.phone,
            urlencoding::encode(message)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{Category, Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn redirector() -> CheckoutRedirector {
        CheckoutRedirector::new(&CheckoutConfig {
            phone: "201222292977".to_string(),
            currency_label: "ج.م".to_string(),
        })
    }

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            long_description: None,
            category: Category::new("x"),
            price: Price::new(Decimal::from(100)),
            image: None,
        }
    }

    fn decoded_text(url: &str) -> String {
        let (_, encoded) = url.split_once("?text=").unwrap();
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        assert_eq!(
            redirector().cart_order_url(&Cart::new()),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_cart_message_lists_entries_in_order() {
        let mut cart = Cart::new();
        cart.add(&product(2, "Blue Toob"));
        cart.add(&product(1, "Dress A"));
        cart.add(&product(2, "Blue Toob"));

        let message = CheckoutRedirector::cart_message(&cart);
        assert_eq!(
            message,
            "مرحباً، أريد طلب المنتجات التالية:\n- Blue Toob (2x)\n- Dress A (1x)"
        );
    }

    #[test]
    fn test_cart_order_url() {
        let mut cart = Cart::new();
        cart.add(&product(7, "Dress A"));

        let url = redirector().cart_order_url(&cart).unwrap();
        assert!(url.starts_with("https://wa.me/201222292977?text="));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
        assert_eq!(decoded_text(&url), CheckoutRedirector::cart_message(&cart));
    }

    #[test]
    fn test_product_order_url() {
        let url = redirector().product_order_url(&product(3, "ثوب & شال"));
        assert_eq!(decoded_text(&url), "مرحباً، أريد طلب ثوب & شال");
        assert!(!url.contains('&'));
    }

    #[test]
    fn test_contact_url_with_and_without_phone() {
        let mut contact = ContactMessage {
            name: " Amna ".to_string(),
            email: Email::parse("amna@example.com").unwrap(),
            phone: Some("0912345678".to_string()),
            message: "Do you ship to Khartoum?".to_string(),
        };

        let text = decoded_text(&redirector().contact_url(&contact));
        assert_eq!(
            text,
            "مرحباً، اسمي Amna\nالإيميل: amna@example.com\nالهاتف: 0912345678\nالرسالة: Do you ship to Khartoum?"
        );

        contact.phone = Some("   ".to_string());
        let text = decoded_text(&redirector().contact_url(&contact));
        assert!(!text.contains("الهاتف"));
    }
}
