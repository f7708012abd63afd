//! Kit/bundle discount evaluation.
//!
//! Kits are evaluated in a fixed precedence order so that product-
//! restricted bundles consume cart items before "any item" bundles see
//! them. Items used by a kit are marked as discounted and excluded from
//! every later kit, preventing the same line from being discounted
//! twice. Incomplete kits may yield a buy-together recommendation
//! instead of a discount.

use std::cmp::Ordering;
use std::collections::HashSet;

use promo_core::{BuyTogetherOffer, CartItem, DiscountType, OfferDiscount, RequestParams};
use rust_decimal::Decimal;

use crate::accumulator::Accumulator;
use crate::rules::ValidatedRule;

/// Hard cap on emitted buy-together recommendations.
const MAX_BUY_TOGETHER_OFFERS: usize = 300;

/// Kits with more products than this are never recommended.
const MAX_RECOMMENDED_KIT_PRODUCTS: usize = 4;

/// Total precedence order over kit rules: product-restricted kits first,
/// then higher quantity thresholds, then higher minimum amounts. Callers
/// break remaining ties by input position, making the order fully
/// deterministic.
fn kit_precedence(a: &ValidatedRule, b: &ValidatedRule) -> Ordering {
    b.rule
        .has_product_restriction()
        .cmp(&a.rule.has_product_restriction())
        .then_with(|| b.rule.min_quantity.cmp(&a.rule.min_quantity))
        .then_with(|| b.resolved.min_amount.cmp(&a.resolved.min_amount))
}

/// Propose the products completing an incomplete kit.
///
/// Only fires for single-line carts whose item belongs to a small kit,
/// and only while the offer budget lasts. The advertised discount is the
/// kit's configured (pre-normalization) spec.
fn recommend_buy_together(
    kit: &ValidatedRule,
    product_ids: &[String],
    params: &RequestParams,
    offers: &mut Vec<BuyTogetherOffer>,
) {
    if params.items.len() != 1
        || product_ids.len() > MAX_RECOMMENDED_KIT_PRODUCTS
        || offers.len() >= MAX_BUY_TOGETHER_OFFERS
    {
        return;
    }
    let base = &params.items[0];
    if !product_ids.iter().any(|pid| *pid == base.product_id) {
        return;
    }

    let others: Vec<&String> = product_ids
        .iter()
        .filter(|pid| **pid != base.product_id)
        .collect();
    if others.is_empty() {
        return;
    }

    // Spread the quantity threshold across the open kit slots.
    let per_item_quantity = if kit.rule.min_quantity > 2 {
        let open_slots = u32::try_from(others.len()).unwrap_or(1);
        kit.rule
            .min_quantity
            .div_ceil(open_slots)
            .saturating_sub(base.quantity.max(1))
            .max(1)
    } else {
        1
    };

    let (discount_type, value) = kit.offer_discount();
    offers.push(BuyTogetherOffer {
        products: others
            .into_iter()
            .map(|pid| (pid.clone(), per_item_quantity))
            .collect(),
        discount: OfferDiscount {
            discount_type,
            value,
        },
    });
}

/// Evaluate validated kit rules against the cart, accumulating discounts
/// and emitting buy-together recommendations for incomplete kits.
pub fn apply_kit_discounts(
    kits: &[ValidatedRule],
    params: &RequestParams,
    acc: &mut Accumulator<'_>,
) {
    let mut order: Vec<(usize, &ValidatedRule)> = kits.iter().enumerate().collect();
    order.sort_by(|(ia, a), (ib, b)| kit_precedence(a, b).then(ia.cmp(ib)));

    let mut discounted_product_ids: HashSet<&str> = HashSet::new();
    let mut offers: Vec<BuyTogetherOffer> = Vec::new();

    for (position, (_, kit)) in order.into_iter().enumerate() {
        let product_ids = kit.rule.scoped_product_ids();
        let mut kit_items: Vec<&CartItem> = params
            .items
            .iter()
            .filter(|item| {
                item.quantity > 0
                    && (product_ids.is_empty()
                        || product_ids.iter().any(|pid| *pid == item.product_id))
                    && !discounted_product_ids.contains(item.product_id.as_str())
            })
            .collect();
        if kit_items.is_empty() {
            continue;
        }

        let mut discount = kit.resolved.clone();
        let min_quantity = kit.rule.min_quantity;
        if min_quantity > 0 {
            if kit.rule.same_product_quantity {
                // Each item must individually meet the threshold.
                kit_items.retain(|item| item.quantity >= min_quantity);
            } else {
                let total_quantity: u32 = kit_items.iter().map(|item| item.quantity).sum();
                if total_quantity < min_quantity {
                    if product_ids.len() > 1 && kit.rule.check_all_items != Some(false) {
                        recommend_buy_together(kit, product_ids, params, &mut offers);
                    }
                    continue;
                }
                // Full-kit repeats stack the fixed discount.
                if discount.discount_type == DiscountType::Fixed
                    && kit.rule.cumulative_discount != Some(false)
                {
                    discount.value *= Decimal::from(total_quantity / min_quantity);
                }
            }
        }

        let below_min_amount = params.amount.as_ref().is_some_and(|amounts| {
            discount.min_amount.is_some_and(|min| min > amounts.total)
        });
        if below_min_amount {
            continue;
        }

        if kit.rule.check_all_items != Some(false) {
            let missing_product = product_ids.iter().any(|pid| {
                !pid.is_empty()
                    && !kit_items
                        .iter()
                        .any(|item| item.quantity > 0 && item.product_id == *pid)
            });
            if missing_product {
                recommend_buy_together(kit, product_ids, params, &mut offers);
                continue;
            }
        }

        if kit.rule.same_product_quantity {
            // One capped discount per qualifying item.
            for (i, item) in kit_items.iter().enumerate() {
                acc.add(
                    &discount,
                    &format!("KIT-{}-{i}", position + 1),
                    kit.rule.label.as_deref(),
                    Some(item.line_total()),
                );
            }
        } else {
            acc.add(
                &discount,
                &format!("KIT-{}", position + 1),
                kit.rule.label.as_deref(),
                None,
            );
        }
        discounted_product_ids.extend(kit_items.iter().map(|item| item.product_id.as_str()));
    }

    if !offers.is_empty() {
        acc.response().buy_together = Some(offers);
    }
}
