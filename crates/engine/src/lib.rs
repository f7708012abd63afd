//! Promo Engine - deterministic discount resolution for cart evaluations.
//!
//! Given a shopping cart snapshot and a merchant-configured catalog of
//! discount rules, the engine decides which single best promotional rule
//! applies, which kit/bundle discounts stack on top, which freebie
//! products to offer, and accumulates everything into one capped
//! response.
//!
//! # Architecture
//!
//! Evaluation is a pure function of the request document and the clock:
//! no shared state survives a call, and input rules are never mutated.
//! The only suspension point is the usage-limit check, which queries the
//! order-history collaborator behind the [`usage::OrderHistory`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use promo_core::DiscountRequest;
//! use promo_engine::{apply_discount, store_api::StoreApiClient};
//!
//! let orders = StoreApiClient::new("https://api.example.com/v1", 100);
//! let request: DiscountRequest = serde_json::from_slice(&body)?;
//! let response = apply_discount(&request, &orders, chrono::Utc::now()).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod accumulator;
mod apply;
pub mod config;
pub mod error;
pub mod freebies;
pub mod kits;
pub mod messages;
pub mod rules;
pub mod store_api;
pub mod usage;

pub use accumulator::Accumulator;
pub use apply::apply_discount;
pub use error::EngineError;
