//! Freebie (gift product) campaign selection.
//!
//! Picks the single best applicable free-product rule. A rule whose
//! subtotal threshold is already met becomes the definitive winner and
//! contributes its products' value as a discount; a rule whose threshold
//! is close (raw subtotal already past it) can still win as a pending,
//! zero-value offer so the storefront can advertise the upcoming gift.

use chrono::{DateTime, Utc};
use promo_core::{DiscountRule, DiscountSpec, RequestParams};
use rust_decimal::Decimal;

use crate::accumulator::Accumulator;
use crate::rules::predicates;

/// Sum of effective prices of cart items granted by the rule.
fn rule_value(rule: &DiscountRule, params: &RequestParams) -> Decimal {
    rule.scoped_product_ids()
        .iter()
        .filter_map(|pid| {
            params
                .items
                .iter()
                .find(|item| item.product_id == *pid)
                .map(promo_core::CartItem::effective_price)
        })
        .sum()
}

/// Evaluate freebie campaign rules, granting the best one's products and
/// accumulating their value as a `FREEBIES` discount event.
pub fn apply_freebies(
    rules: &[DiscountRule],
    params: &RequestParams,
    now: DateTime<Utc>,
    acc: &mut Accumulator<'_>,
) {
    let candidates: Vec<&DiscountRule> = rules
        .iter()
        .filter(|rule| {
            predicates::date_range_valid(rule, now)
                && predicates::customer_eligible(rule, params.customer_id())
                && predicates::campaign_products_in_cart(
                    rule.check_product_ids.as_deref(),
                    params,
                    None,
                )
                && rule.has_product_restriction()
        })
        .collect();

    let subtotal = params.items_subtotal();
    let mut best_rule: Option<&DiscountRule> = None;
    let mut discount_value = Decimal::ZERO;

    for rule in candidates {
        let value = rule_value(rule, params);
        // The threshold is checked against the subtotal with the gifted
        // items' value taken back out.
        let fixed_subtotal = subtotal - value;
        let displaces = match best_rule {
            None => true,
            Some(best) => {
                value > discount_value
                    || best
                        .min_subtotal
                        .zip(rule.min_subtotal)
                        .is_some_and(|(b, r)| b < r)
            }
        };
        if !displaces {
            continue;
        }
        if !rule.min_subtotal.is_some_and(|min| min > fixed_subtotal) {
            best_rule = Some(rule);
            discount_value = value;
        } else if discount_value == Decimal::ZERO
            && rule.min_subtotal.is_some_and(|min| subtotal >= min)
        {
            // Not applicable yet, but advertise the pending gift.
            best_rule = Some(rule);
        }
    }

    if let Some(best) = best_rule {
        tracing::debug!(label = ?best.label, %discount_value, "freebie campaign selected");
        acc.response().freebie_product_ids = Some(best.scoped_product_ids().to_vec());
        if discount_value > Decimal::ZERO {
            acc.add(
                &DiscountSpec::fixed(discount_value),
                "FREEBIES",
                best.label.as_deref(),
                None,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::{Amounts, CartItem, DiscountResponse};

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    fn item(product_id: &str, quantity: u32, price: &str) -> CartItem {
        CartItem {
            product_id: product_id.to_string(),
            quantity,
            price: dec(price),
            ..CartItem::default()
        }
    }

    fn freebie_rule(product_ids: &[&str], min_subtotal: Option<&str>) -> DiscountRule {
        DiscountRule {
            product_ids: Some(product_ids.iter().map(ToString::to_string).collect()),
            min_subtotal: min_subtotal.map(dec),
            ..DiscountRule::default()
        }
    }

    fn params_with_subtotal(items: Vec<CartItem>) -> RequestParams {
        let total = items
            .iter()
            .map(|i| i.effective_price() * Decimal::from(i.quantity))
            .sum();
        RequestParams {
            items,
            amount: Some(Amounts {
                total,
                ..Amounts::default()
            }),
            ..RequestParams::default()
        }
    }

    fn evaluate(rules: &[DiscountRule], params: &RequestParams) -> DiscountResponse {
        let mut response = DiscountResponse::default();
        let mut acc = Accumulator::new(&mut response, params.amount.as_ref());
        apply_freebies(rules, params, Utc::now(), &mut acc);
        response
    }

    #[test]
    fn test_met_threshold_selects_definitively() {
        // Subtotal 150 against thresholds 100 and 200: the 100 rule wins.
        let rules = vec![
            freebie_rule(&["gift-a"], Some("100")),
            freebie_rule(&["gift-b"], Some("200")),
        ];
        let params = params_with_subtotal(vec![item("p1", 3, "50")]);
        let response = evaluate(&rules, &params);
        assert_eq!(
            response.freebie_product_ids,
            Some(vec!["gift-a".to_string()])
        );
        // Gifted product not in cart, so no discount value accumulates.
        assert!(response.discount_rule.is_none());
    }

    #[test]
    fn test_low_subtotal_selects_pending_rule_with_zero_value() {
        let rules = vec![freebie_rule(&["gift-a"], Some("100"))];
        let params = params_with_subtotal(vec![item("p1", 1, "50")]);
        let response = evaluate(&rules, &params);
        // Threshold unmet and subtotal below it: nothing to advertise.
        assert!(response.freebie_product_ids.is_none());
    }

    #[test]
    fn test_gifted_item_in_cart_accumulates_discount() {
        let rules = vec![freebie_rule(&["gift-a"], Some("50"))];
        let params = params_with_subtotal(vec![item("p1", 2, "40"), item("gift-a", 1, "10")]);
        let response = evaluate(&rules, &params);
        assert_eq!(
            response.freebie_product_ids,
            Some(vec!["gift-a".to_string()])
        );
        let applied = response.discount_rule.expect("freebie value applied");
        assert_eq!(applied.extra_discount.value, dec("10"));
        assert_eq!(applied.extra_discount.flags, vec!["FREEBIES"]);
    }

    #[test]
    fn test_pending_offer_when_gift_pushes_subtotal_below_threshold() {
        // Subtotal 100 meets the threshold, but removing the gifted
        // item's value (30) drops it to 70: the offer stays pending.
        let rules = vec![freebie_rule(&["gift-a"], Some("90"))];
        let params = params_with_subtotal(vec![item("p1", 1, "70"), item("gift-a", 1, "30")]);
        let response = evaluate(&rules, &params);
        assert_eq!(
            response.freebie_product_ids,
            Some(vec!["gift-a".to_string()])
        );
        assert!(response.discount_rule.is_none());
    }

    #[test]
    fn test_higher_value_rule_displaces_current_best() {
        let rules = vec![
            freebie_rule(&["gift-a"], None),
            freebie_rule(&["gift-b"], None),
        ];
        let params = params_with_subtotal(vec![
            item("p1", 1, "100"),
            item("gift-a", 1, "5"),
            item("gift-b", 1, "15"),
        ]);
        let response = evaluate(&rules, &params);
        assert_eq!(
            response.freebie_product_ids,
            Some(vec!["gift-b".to_string()])
        );
        assert_eq!(
            response.discount_rule.expect("applied").extra_discount.value,
            dec("15")
        );
    }

    #[test]
    fn test_campaign_product_precheck_filters_rule() {
        let rule = DiscountRule {
            check_product_ids: Some(vec!["required".to_string()]),
            ..freebie_rule(&["gift-a"], None)
        };
        let params = params_with_subtotal(vec![item("p1", 1, "100")]);
        let response = evaluate(&[rule], &params);
        assert!(response.freebie_product_ids.is_none());
    }

    #[test]
    fn test_rule_without_products_is_ignored() {
        let rule = DiscountRule {
            product_ids: Some(vec![]),
            ..DiscountRule::default()
        };
        let params = params_with_subtotal(vec![item("p1", 1, "100")]);
        let response = evaluate(&[rule], &params);
        assert!(response.freebie_product_ids.is_none());
    }
}
