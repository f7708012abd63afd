//! Promo Core - Shared types library.
//!
//! This crate provides the common types used across the promo engine
//! components:
//! - `engine` - The discount-resolution pipeline
//! - `integration-tests` - End-to-end evaluation tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! evaluation logic. Everything here is request-scoped value data: rules
//! arrive whole from merchant configuration, carts arrive whole from the
//! caller, and nothing outlives a single evaluation call.
//!
//! # Modules
//!
//! - [`types`] - Discount specs, rules, cart/request params, and the
//!   response document

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
