//! Boutique Core - Shared types library.
//!
//! This crate provides common types used across all Boutique components:
//! - `storefront` - Public-facing web storefront
//! - `cli` - Command-line catalog browser and local cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no storage. Cart persistence lives in the storefront crate, which
//! serializes [`Cart`] through whichever key-value backend it is given.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, catalog products and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
