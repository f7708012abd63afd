//! Usage-limit enforcement against historical orders.
//!
//! A matched rule may cap how many times its discount can be used, per
//! customer and in total. Each configured cap becomes one count query
//! against the order-history collaborator, evaluated strictly in
//! sequence with early exit: the customer-scoped check runs first, and
//! the total check is skipped once a limit is breached or a query fails.

use async_trait::async_trait;
use promo_core::DiscountRule;
use thiserror::Error;

use crate::error::EngineError;

/// Errors from the order-history collaborator.
#[derive(Debug, Error)]
pub enum OrderHistoryError {
    /// The request could not be sent or the response not read.
    #[error("order history request failed: {0}")]
    Request(String),
    /// The collaborator answered with a non-success status.
    #[error("order history returned status {0}")]
    Status(u16),
}

/// Filter for counting historical orders that used a discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCountFilter {
    /// Discount label recorded on the order.
    pub label: String,
    /// Match the label ignoring case.
    pub case_insensitive: bool,
    /// Restrict the count to one customer's orders.
    pub customer_id: Option<String>,
}

/// Injectable order-history lookup.
///
/// The engine only needs a count of matching historical orders; keeping
/// this behind a trait keeps evaluation testable without a live
/// collaborator.
#[async_trait]
pub trait OrderHistory: Send + Sync {
    /// Count historical orders matching the filter.
    async fn count_orders(&self, filter: &OrderCountFilter) -> Result<u64, OrderHistoryError>;
}

/// Outcome of the usage-limit sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCheck {
    /// All configured limits have headroom.
    WithinLimits,
    /// A limit is already met or exceeded.
    LimitReached,
}

/// Enforce the rule's usage caps for the given customer.
///
/// # Errors
///
/// Returns [`EngineError::UsageLimitCheck`] when a count query fails;
/// the evaluation must surface this as a hard error, not an
/// ineligibility outcome.
pub async fn check_usage_limits(
    orders: &dyn OrderHistory,
    rule: &DiscountRule,
    label: &str,
    customer_id: &str,
) -> Result<UsageCheck, EngineError> {
    let limits = [
        // Limit by customer first, then the total cap.
        (
            OrderCountFilter {
                label: label.to_string(),
                case_insensitive: rule.case_insensitive,
                customer_id: Some(customer_id.to_string()),
            },
            rule.usage_limit,
        ),
        (
            OrderCountFilter {
                label: label.to_string(),
                case_insensitive: rule.case_insensitive,
                customer_id: None,
            },
            rule.total_usage_limit,
        ),
    ];

    for (filter, max) in limits {
        if max == 0 {
            continue;
        }
        let count = orders.count_orders(&filter).await?;
        if count >= u64::from(max) {
            tracing::debug!(%label, count, max, "usage limit reached");
            return Ok(UsageCheck::LimitReached);
        }
    }
    Ok(UsageCheck::WithinLimits)
}
