//! Discount specification types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a discount value combines with a base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Flat amount off.
    #[default]
    Fixed,
    /// Percentage of the cap basis.
    Percentage,
}

/// Named amount fields on the request that a discount can reference,
/// either as its cap basis (`apply_at`) or as its minimum-amount gate
/// (`amount_field`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountField {
    /// Order total.
    #[default]
    Total,
    /// Items subtotal.
    Subtotal,
    /// Freight / shipping amount.
    Freight,
    /// Discount already applied upstream.
    Discount,
}

/// A discount specification: how much to take off and against which amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiscountSpec {
    /// Fixed amount or percentage.
    #[serde(rename = "type", default)]
    pub discount_type: DiscountType,
    /// Discount magnitude. Invariant: `value >= 0`.
    #[serde(default)]
    pub value: Decimal,
    /// Minimum amount the referenced field must reach before applying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    /// Amount field checked against `min_amount` (default `total`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_field: Option<AmountField>,
    /// Amount field used as the cap basis (default `total`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_at: Option<AmountField>,
}

impl DiscountSpec {
    /// Build a plain fixed-value spec.
    #[must_use]
    pub fn fixed(value: Decimal) -> Self {
        Self {
            discount_type: DiscountType::Fixed,
            value,
            ..Self::default()
        }
    }

    /// Raw discount value against a cap basis, before clamping.
    ///
    /// Percentage specs scale the cap; fixed specs return their value as-is.
    #[must_use]
    pub fn value_against(&self, cap: Decimal) -> Decimal {
        match self.discount_type {
            DiscountType::Percentage => cap * self.value / Decimal::from(100),
            DiscountType::Fixed => self.value,
        }
    }
}
