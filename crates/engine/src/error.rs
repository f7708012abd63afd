//! Engine error type.
//!
//! Almost every failure mode of an evaluation is an *ineligibility
//! outcome* surfaced inside the response document, not an error. The one
//! hard error path is the order-history collaborator failing while usage
//! limits are being checked.

use thiserror::Error;

use crate::usage::OrderHistoryError;

/// Errors terminating an evaluation without a decision.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The order-history query collaborator failed, so usage limits
    /// could not be verified.
    #[error("can't check discount usage limits: {0}")]
    UsageLimitCheck(#[from] OrderHistoryError),
}

impl EngineError {
    /// Stable wire code identifying the error to API clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UsageLimitCheck(_) => "CANT_CHECK_USAGE_LIMITS",
        }
    }
}
