//! Cart snapshot types consumed from the evaluation request.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::discount::AmountField;

/// A category attached to a cart item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemCategory {
    /// Category identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Category display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// One cart line item. Read-only for the whole evaluation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CartItem {
    /// Product identifier.
    pub product_id: String,
    /// Units of this product in the cart.
    pub quantity: u32,
    /// Listed unit price.
    pub price: Decimal,
    /// Current selling price, when different from the listed price.
    pub final_price: Option<Decimal>,
    /// Categories the product belongs to.
    pub categories: Vec<ItemCategory>,
    /// Product display name.
    pub name: Option<String>,
}

impl CartItem {
    /// Effective unit price: the current selling price when set, the
    /// listed price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.final_price.unwrap_or(self.price)
    }

    /// Line value: effective price times quantity, at least one unit.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.effective_price() * Decimal::from(self.quantity.max(1))
    }
}

/// Monetary amounts of the cart being evaluated.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Amounts {
    /// Order total.
    pub total: Decimal,
    /// Items subtotal.
    pub subtotal: Option<Decimal>,
    /// Freight / shipping amount.
    pub freight: Option<Decimal>,
    /// Discount already applied upstream of this evaluation.
    pub discount: Option<Decimal>,
}

impl Amounts {
    /// Look up an amount by field name. Returns `None` for fields the
    /// request did not supply, so callers can distinguish "absent" from
    /// zero.
    #[must_use]
    pub fn get(&self, field: AmountField) -> Option<Decimal> {
        match field {
            AmountField::Total => Some(self.total),
            AmountField::Subtotal => self.subtotal,
            AmountField::Freight => self.freight,
            AmountField::Discount => self.discount,
        }
    }
}

/// The customer attached to the request, if known.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Customer {
    /// Customer identifier.
    #[serde(rename = "_id")]
    pub id: String,
}

/// UTM tracking data forwarded with the request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Utm {
    /// Campaign name, matched against rules' `utm_campaign`.
    pub campaign: Option<String>,
}

/// Full cart context for one evaluation request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RequestParams {
    /// Cart line items.
    pub items: Vec<CartItem>,
    /// Cart amounts.
    pub amount: Option<Amounts>,
    /// Customer identity, when authenticated.
    pub customer: Option<Customer>,
    /// Coupon code typed by the customer.
    pub discount_coupon: Option<String>,
    /// UTM tracking data.
    pub utm: Option<Utm>,
    /// Customer language tag (e.g. `pt_br`).
    pub lang: Option<String>,
}

impl RequestParams {
    /// Customer id, when one is attached to the request.
    #[must_use]
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.id.as_str())
    }

    /// UTM campaign name, when one is attached to the request.
    #[must_use]
    pub fn utm_campaign(&self) -> Option<&str> {
        self.utm.as_ref().and_then(|u| u.campaign.as_deref())
    }

    /// Cart subtotal computed from the items themselves.
    #[must_use]
    pub fn items_subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.effective_price() * Decimal::from(item.quantity))
            .sum()
    }
}
