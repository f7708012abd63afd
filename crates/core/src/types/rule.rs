//! Merchant-authored discount rule configuration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::discount::DiscountSpec;

/// Validity window for a rule, inclusive at both bounds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Rule is inactive before this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Rule is inactive after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whether `now` falls inside the window. Open bounds always pass.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start <= now) && self.end.is_none_or(|end| end >= now)
    }
}

/// A merchant-configured discount rule.
///
/// One shape serves the three rule catalogs (promotional rules, product
/// kits, and freebie campaigns); each catalog reads the subset of fields
/// it cares about. Rules are read-only per request - normalization never
/// writes back into them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DiscountRule {
    /// Coupon code matched against the request's `discount_coupon`.
    pub discount_coupon: Option<String>,
    /// UTM campaign matched against the request's `utm.campaign`.
    pub utm_campaign: Option<String>,
    /// Compare coupon/UTM codes ignoring case.
    pub case_insensitive: bool,
    /// Restrict to these customers. Empty means no restriction.
    pub customer_ids: Vec<String>,
    /// Scope to these products. `Some(vec![])` scopes by "any product"
    /// (relevant for kit ordering), `None` means unscoped.
    pub product_ids: Option<Vec<String>>,
    /// Scope to items carrying at least one of these categories.
    pub category_ids: Option<Vec<String>>,
    /// Reject the promotion outright if any of these products is in the cart.
    pub excluded_product_ids: Option<Vec<String>>,
    /// Validity window.
    pub date_range: Option<DateRange>,
    /// The configured discount.
    pub discount: Option<DiscountSpec>,
    /// Advertise this rule even when another extra discount is shown.
    pub default_discount: bool,
    /// `Some(false)` disables stacking/accumulation for this rule.
    pub cumulative_discount: Option<bool>,
    /// Derive the discount base from the cheapest matching item.
    pub discount_lowest_price: bool,
    /// Derive the discount base from the matching items' subtotal.
    pub discount_kit_subtotal: bool,
    /// Quantity threshold for kit discounts.
    pub min_quantity: u32,
    /// Require each item individually to meet `min_quantity`.
    pub same_product_quantity: bool,
    /// `Some(false)` skips the every-kit-product-present requirement.
    pub check_all_items: Option<bool>,
    /// Per-customer usage cap. Zero means unlimited.
    pub usage_limit: u32,
    /// Total usage cap across all customers. Zero means unlimited.
    pub total_usage_limit: u32,
    /// Subtotal threshold for freebie campaigns.
    pub min_subtotal: Option<Decimal>,
    /// Products that must be in the cart for a freebie campaign to apply.
    pub check_product_ids: Option<Vec<String>>,
    /// Display label.
    pub label: Option<String>,
    /// Display description.
    pub description: Option<String>,
}

impl DiscountRule {
    /// Products this rule is scoped to, treating a missing list as empty.
    #[must_use]
    pub fn scoped_product_ids(&self) -> &[String] {
        self.product_ids.as_deref().unwrap_or(&[])
    }

    /// Whether the rule restricts the kit to specific products.
    #[must_use]
    pub fn has_product_restriction(&self) -> bool {
        self.product_ids.as_ref().is_some_and(|ids| !ids.is_empty())
    }
}

/// Which request signal selected the matched rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    /// Matched by coupon code.
    Coupon,
    /// Matched by UTM campaign.
    Utm,
    /// Matched by customer identity.
    Customer,
    /// Matched as an open promotion.
    Open,
}

impl MatchKind {
    /// Short wire flag recorded on the accumulated discount.
    #[must_use]
    pub const fn as_flag(self) -> &'static str {
        match self {
            Self::Coupon => "COUPON",
            Self::Utm => "UTM",
            Self::Customer => "CUSTOMER",
            Self::Open => "OPEN",
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_range_inclusive_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid date");
        let range = DateRange {
            start: Some(now),
            end: Some(now),
        };
        // Both bounds are inclusive: end exactly equal to "now" is valid.
        assert!(range.contains(now));
        assert!(!range.contains(now + chrono::Duration::microseconds(1)));
        assert!(!range.contains(now - chrono::Duration::microseconds(1)));
    }

    #[test]
    fn test_open_bounds_always_pass() {
        let now = Utc::now();
        assert!(DateRange::default().contains(now));
    }

    #[test]
    fn test_rule_deserializes_from_config_document() {
        let rule: DiscountRule = serde_json::from_value(serde_json::json!({
            "discount_coupon": "SAVE10",
            "case_insensitive": true,
            "discount": { "type": "percentage", "value": 10 },
            "usage_limit": 2,
            "unknown_merchant_field": "ignored"
        }))
        .expect("valid rule");
        assert_eq!(rule.discount_coupon.as_deref(), Some("SAVE10"));
        assert!(rule.case_insensitive);
        assert_eq!(rule.usage_limit, 2);
        assert!(rule.product_ids.is_none());
        assert!(!rule.has_product_restriction());
    }

    #[test]
    fn test_empty_product_list_is_not_a_restriction() {
        let rule = DiscountRule {
            product_ids: Some(vec![]),
            ..DiscountRule::default()
        };
        assert!(!rule.has_product_restriction());
        assert!(rule.scoped_product_ids().is_empty());
    }
}
