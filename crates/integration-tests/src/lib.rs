//! Shared helpers for the promo engine end-to-end tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;

use async_trait::async_trait;
use promo_core::DiscountRequest;
use promo_engine::usage::{OrderCountFilter, OrderHistory, OrderHistoryError};

/// Parse a full request document from JSON.
///
/// # Panics
///
/// Panics when the document does not match the request schema.
#[must_use]
pub fn request_from_json(json: serde_json::Value) -> DiscountRequest {
    serde_json::from_value(json).expect("valid request document")
}

/// In-memory order history with a fixed count and a query log.
pub struct FakeOrderHistory {
    count: u64,
    fail_with_status: Option<u16>,
    calls: Mutex<Vec<OrderCountFilter>>,
}

impl FakeOrderHistory {
    /// History answering every query with `count`.
    #[must_use]
    pub fn with_count(count: u64) -> Self {
        Self {
            count,
            fail_with_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// History failing every query with an HTTP-style status.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            count: 0,
            fail_with_status: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Filters the engine queried, in order.
    ///
    /// # Panics
    ///
    /// Panics when the internal lock is poisoned.
    #[must_use]
    pub fn queries(&self) -> Vec<OrderCountFilter> {
        self.calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl OrderHistory for FakeOrderHistory {
    async fn count_orders(&self, filter: &OrderCountFilter) -> Result<u64, OrderHistoryError> {
        self.calls.lock().expect("lock").push(filter.clone());
        match self.fail_with_status {
            Some(status) => Err(OrderHistoryError::Status(status)),
            None => Ok(self.count),
        }
    }
}
