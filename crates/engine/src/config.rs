//! Merchant configuration interpretation.
//!
//! Merges the application's `data` and `hidden_data` settings
//! (`hidden_data` wins) and splits the result into the three rule
//! catalogs. Any other top-level field carrying a `discount` definition
//! is folded into the promotional catalog with the field's own name as
//! its coupon code - that fold happens exactly once here, so the rest of
//! the engine never inspects unknown configuration keys.
//!
//! Malformed rules are configuration anomalies, not errors: they are
//! dropped with a warning and evaluation proceeds.

use promo_core::{Application, DiscountRule};
use serde_json::{Map, Value};

/// Configuration field names reserved for the rule catalogs.
const RESERVED_FIELDS: [&str; 3] = ["discount_rules", "product_kit_discounts", "freebies_rules"];

/// The merchant's rule catalogs, ready for evaluation.
#[derive(Debug, Clone, Default)]
pub struct MerchantConfig {
    /// Kit/bundle discount rules.
    pub product_kit_discounts: Vec<DiscountRule>,
    /// Freebie campaign rules.
    pub freebies_rules: Vec<DiscountRule>,
    /// Promotional rules, including folded implicit coupons.
    pub discount_rules: Vec<DiscountRule>,
}

/// Parse a rule array leniently, dropping malformed entries.
fn parse_rules(value: Option<&Value>) -> Vec<DiscountRule> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(rule) => Some(rule),
            Err(err) => {
                tracing::warn!(%err, "skipping malformed discount rule");
                None
            }
        })
        .collect()
}

impl MerchantConfig {
    /// Interpret an application installation copy.
    #[must_use]
    pub fn from_application(application: &Application) -> Self {
        let mut merged: Map<String, Value> = application.data.clone().unwrap_or_default();
        if let Some(hidden) = &application.hidden_data {
            for (key, value) in hidden {
                merged.insert(key.clone(), value.clone());
            }
        }

        let mut product_kit_discounts = parse_rules(merged.get("product_kit_discounts"));
        // Kits without a product list apply to any item.
        for kit in &mut product_kit_discounts {
            kit.product_ids.get_or_insert_with(Vec::new);
        }

        let freebies_rules = parse_rules(merged.get("freebies_rules"));
        let mut discount_rules = parse_rules(merged.get("discount_rules"));

        // Implicit coupons: any leftover field holding a discount
        // definition becomes a rule whose coupon code is the field name.
        for (field, value) in &merged {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                continue;
            }
            if !value.get("discount").is_some_and(|d| !d.is_null()) {
                continue;
            }
            match serde_json::from_value::<DiscountRule>(value.clone()) {
                Ok(rule) => discount_rules.push(DiscountRule {
                    discount_coupon: Some(field.clone()),
                    ..rule
                }),
                Err(err) => {
                    tracing::warn!(field, %err, "skipping malformed implicit coupon");
                }
            }
        }

        Self {
            product_kit_discounts,
            freebies_rules,
            discount_rules,
        }
    }
}
