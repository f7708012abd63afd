//! Stateless rule predicates.
//!
//! These checks decide whether a rule is in play for the current request
//! before any discount arithmetic happens.

use chrono::{DateTime, Utc};
use promo_core::{CartItem, DiscountRule, RequestParams};

/// Whether the rule's validity window contains `now`. Rules without a
/// window are always valid; both bounds are inclusive.
#[must_use]
pub fn date_range_valid(rule: &DiscountRule, now: DateTime<Utc>) -> bool {
    rule.date_range.as_ref().is_none_or(|range| range.contains(now))
}

/// Whether the rule is open to the request's customer. Rules without a
/// customer restriction are open to everyone, including anonymous carts.
#[must_use]
pub fn customer_eligible(rule: &DiscountRule, customer_id: Option<&str>) -> bool {
    rule.customer_ids.is_empty()
        || customer_id.is_some_and(|id| rule.customer_ids.iter().any(|c| c == id))
}

/// Whether the rule is an open promotion: no coupon code, no UTM
/// campaign, and no customer restriction.
#[must_use]
pub fn open_promotion(rule: &DiscountRule) -> bool {
    rule.discount_coupon.is_none() && rule.utm_campaign.is_none() && rule.customer_ids.is_empty()
}

/// Whether the item belongs to at least one of the campaign categories.
///
/// An empty/absent category list means no restriction; an item without
/// categories cannot be restricted either. Unlike the legacy behavior
/// this enforces the intersection instead of always passing.
#[must_use]
pub fn matches_category(category_ids: Option<&[String]>, item: &CartItem) -> bool {
    let Some(category_ids) = category_ids.filter(|ids| !ids.is_empty()) else {
        return true;
    };
    if item.categories.is_empty() {
        return true;
    }
    item.categories
        .iter()
        .any(|category| category_ids.iter().any(|id| *id == category.id))
}

/// Whether the cart contains at least one campaign product (or, failing a
/// product list, at least one item in a campaign category).
#[must_use]
pub fn campaign_products_in_cart(
    product_ids: Option<&[String]>,
    params: &RequestParams,
    category_ids: Option<&[String]>,
) -> bool {
    if let Some(product_ids) = product_ids.filter(|ids| !ids.is_empty()) {
        params.items.iter().any(|item| {
            item.quantity > 0
                && product_ids.iter().any(|id| *id == item.product_id)
                && matches_category(category_ids, item)
        })
    } else if let Some(category_ids) = category_ids.filter(|ids| !ids.is_empty()) {
        params
            .items
            .iter()
            .any(|item| item.quantity > 0 && matches_category(Some(category_ids), item))
    } else {
        true
    }
}
