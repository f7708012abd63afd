//! Core types for the promo engine.
//!
//! This module provides the domain vocabulary: discount specifications,
//! merchant-authored rules, cart snapshots, and the response document.

pub mod cart;
pub mod discount;
pub mod request;
pub mod response;
pub mod rule;

pub use cart::*;
pub use discount::*;
pub use request::*;
pub use response::*;
pub use rule::*;
