//! Rule validation and discount normalization.
//!
//! Filters a rule catalog down to the rules applicable right now and
//! resolves product/category-scoped discounts to a concrete fixed value
//! derived from the cart contents. Input rules are never mutated: each
//! eligible rule comes back as a [`ValidatedRule`] carrying both the
//! merchant-configured spec and the resolved one.

use chrono::{DateTime, Utc};
use promo_core::{CartItem, DiscountRule, DiscountSpec, DiscountType, RequestParams};
use rust_decimal::Decimal;

use super::predicates;

/// An eligible rule with its discount resolved for this cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRule {
    /// The rule as configured by the merchant.
    pub rule: DiscountRule,
    /// The discount exactly as configured (zero-valued spec when the
    /// rule relied purely on derivation).
    pub configured: DiscountSpec,
    /// The discount to actually apply; always carries a nonzero value.
    pub resolved: DiscountSpec,
}

impl ValidatedRule {
    /// Discount type advertised on buy-together offers: the configured
    /// spec when it has a value, the resolved one otherwise.
    #[must_use]
    pub fn offer_discount(&self) -> (DiscountType, Decimal) {
        if self.configured.value > Decimal::ZERO {
            (self.configured.discount_type, self.configured.value)
        } else {
            (self.resolved.discount_type, self.resolved.value)
        }
    }
}

/// Whether the item falls inside the rule's product scope.
fn product_in_scope(rule: &DiscountRule, item: &CartItem) -> bool {
    rule.product_ids
        .as_ref()
        .is_none_or(|ids| ids.is_empty() || ids.iter().any(|id| *id == item.product_id))
}

/// Derive a discount base from the cart for product/category-scoped rules.
///
/// `discount_lowest_price` takes the minimum positive effective price
/// among matching items; `discount_kit_subtotal` sums `price * quantity`
/// over them. Returns `None` when the rule uses neither strategy or no
/// item matches.
fn derive_base(rule: &DiscountRule, items: &[CartItem]) -> Option<Decimal> {
    let category_ids = rule.category_ids.as_deref();
    let matching = items.iter().filter(|item| {
        item.effective_price() > Decimal::ZERO
            && product_in_scope(rule, item)
            && predicates::matches_category(category_ids, item)
    });

    let value = if rule.discount_lowest_price {
        matching.map(CartItem::effective_price).min()?
    } else if rule.discount_kit_subtotal {
        matching
            .map(|item| item.effective_price() * Decimal::from(item.quantity))
            .sum()
    } else {
        return None;
    };
    (value > Decimal::ZERO).then_some(value)
}

/// Resolve one rule against the request, rejecting it when ineligible.
fn validate_rule(
    rule: &DiscountRule,
    params: &RequestParams,
    items: Option<&[CartItem]>,
    now: DateTime<Utc>,
) -> Option<ValidatedRule> {
    if !predicates::customer_eligible(rule, params.customer_id()) {
        return None;
    }

    let configured = rule.discount.clone().unwrap_or_default();
    let scoped = rule.product_ids.is_some() || rule.category_ids.is_some();
    let derived = match items {
        Some(items) if scoped => derive_base(rule, items),
        _ => None,
    };

    let resolved = if let Some(mut value) = derived {
        if configured.value > Decimal::ZERO {
            value = match configured.discount_type {
                DiscountType::Percentage => value * configured.value / Decimal::from(100),
                // A configured fixed value replaces the kit subtotal but
                // only caps the lowest-price base.
                DiscountType::Fixed if rule.discount_kit_subtotal => configured.value,
                DiscountType::Fixed => value.min(configured.value),
            };
        }
        DiscountSpec {
            discount_type: DiscountType::Fixed,
            value,
            ..configured.clone()
        }
    } else {
        configured.clone()
    };

    if resolved.value <= Decimal::ZERO {
        tracing::debug!(label = ?rule.label, "rule rejected: no discount value");
        return None;
    }
    if !predicates::date_range_valid(rule, now) {
        tracing::debug!(label = ?rule.label, "rule rejected: outside date range");
        return None;
    }

    Some(ValidatedRule {
        rule: rule.clone(),
        configured,
        resolved,
    })
}

/// Filter a rule catalog to the rules applicable right now, preserving
/// input order. Pass `items` to enable derived-discount resolution for
/// product/category-scoped rules (kit catalogs do; plain promotional
/// catalogs do not).
#[must_use]
pub fn validate_rules(
    rules: &[DiscountRule],
    params: &RequestParams,
    items: Option<&[CartItem]>,
    now: DateTime<Utc>,
) -> Vec<ValidatedRule> {
    rules
        .iter()
        .filter_map(|rule| validate_rule(rule, params, items, now))
        .collect()
}
