//! Core types for Boutique.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartEntry, CartStateError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use product::{Category, CategoryFilter, Product};
