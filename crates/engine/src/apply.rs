//! The cart-evaluation pipeline.
//!
//! Control flow per request: kit discounts (independent pass over the
//! items), freebie campaigns (independent pass), then the single best
//! promotional rule via validation and precedence matching, usage-limit
//! enforcement when the matched rule asks for it, and finally response
//! cleanup. Everything is synchronous except the usage-limit queries.

use chrono::{DateTime, Utc};
use promo_core::{
    AmountField, AvailableExtraDiscount, DiscountRequest, DiscountResponse, PREVIEW_LABEL_MAX_LEN,
};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::accumulator::Accumulator;
use crate::config::MerchantConfig;
use crate::error::EngineError;
use crate::usage::{OrderHistory, UsageCheck};
use crate::{freebies, kits, messages, rules, usage};

/// Evaluate one cart request against the merchant's discount catalogs.
///
/// The result is deterministic for a given request document and clock
/// value; input rules are never modified.
///
/// # Errors
///
/// Returns [`EngineError::UsageLimitCheck`] when the order-history
/// collaborator fails while usage limits are being verified. Every
/// other ineligibility is reported inside the response.
#[instrument(skip_all, fields(
    items = request.params.items.len(),
    coupon = ?request.params.discount_coupon,
))]
pub async fn apply_discount(
    request: &DiscountRequest,
    orders: &dyn OrderHistory,
    now: DateTime<Utc>,
) -> Result<DiscountResponse, EngineError> {
    let params = &request.params;
    let lang = params.lang.as_deref();
    let config = MerchantConfig::from_application(&request.application);
    let mut response = DiscountResponse::default();

    if !params.items.is_empty() {
        let mut acc = Accumulator::new(&mut response, params.amount.as_ref());
        let kit_rules = rules::validate_rules(
            &config.product_kit_discounts,
            params,
            Some(&params.items),
            now,
        );
        kits::apply_kit_discounts(&kit_rules, params, &mut acc);
        freebies::apply_freebies(&config.freebies_rules, params, now, &mut acc);
    }

    let validated = rules::validate_rules(&config.discount_rules, params, None, now);
    let matched = rules::match_rule(&validated, params);
    let Some(matched_rule) = matched.rule else {
        response.finalize();
        return Ok(response);
    };

    if !rules::predicates::campaign_products_in_cart(
        matched_rule.rule.product_ids.as_deref(),
        params,
        matched_rule.rule.category_ids.as_deref(),
    ) {
        return Ok(DiscountResponse::invalid_coupon(
            messages::no_promotion_products(lang),
            response.available_extra_discount.take(),
        ));
    }

    if let Some(excluded) = matched_rule
        .rule
        .excluded_product_ids
        .as_deref()
        .filter(|ids| !ids.is_empty())
    {
        let banned = params
            .items
            .iter()
            .find(|item| item.quantity > 0 && excluded.iter().any(|pid| *pid == item.product_id));
        if let Some(item) = banned {
            let name = item.name.as_deref().unwrap_or(&item.product_id);
            return Ok(DiscountResponse::invalid_coupon(
                messages::invalid_for_product(lang, name),
                response.available_extra_discount.take(),
            ));
        }
    }

    let label = matched_rule
        .rule
        .label
        .clone()
        .filter(|label| !label.is_empty())
        .or_else(|| params.discount_coupon.clone())
        .unwrap_or_else(|| format!("DISCOUNT {}", matched.kind.as_flag()));

    let discount = &matched_rule.resolved;
    let preview_suppressed = discount.apply_at == Some(AmountField::Freight)
        || (response
            .available_extra_discount
            .as_ref()
            .is_some_and(|preview| preview.value.is_some_and(|v| v > Decimal::ZERO))
            && !matched_rule.rule.default_discount
            && !rules::predicates::open_promotion(&matched_rule.rule));
    if !preview_suppressed {
        response.available_extra_discount = Some(AvailableExtraDiscount {
            label: label.chars().take(PREVIEW_LABEL_MAX_LEN).collect(),
            min_amount: discount.min_amount.filter(|min| *min > Decimal::ZERO),
            discount_type: Some(discount.discount_type),
            value: (discount.value > Decimal::ZERO).then_some(discount.value),
        });
    }

    let Some(amounts) = params
        .amount
        .as_ref()
        .filter(|amounts| amounts.total > Decimal::ZERO)
    else {
        response.finalize();
        return Ok(response);
    };

    let gate_field = discount.amount_field.unwrap_or(AmountField::Total);
    let below_min_amount = discount.min_amount.is_some_and(|min| {
        amounts
            .get(gate_field)
            .is_some_and(|amount| min > amount)
    });
    if below_min_amount {
        response.finalize();
        return Ok(response);
    }

    if matched_rule.rule.cumulative_discount == Some(false)
        && (response.discount_rule.is_some()
            || amounts.discount.is_some_and(|d| d > Decimal::ZERO))
    {
        return Ok(DiscountResponse::invalid_coupon(
            messages::not_cumulative(lang),
            None,
        ));
    }

    let added =
        Accumulator::new(&mut response, Some(amounts)).add(discount, matched.kind.as_flag(), None, None);
    if added {
        if let Some(applied) = response.discount_rule.as_mut() {
            applied.label.clone_from(&label);
            if matched_rule.rule.description.is_some() {
                applied.description.clone_from(&matched_rule.rule.description);
            }
        }

        if let Some(customer_id) = params.customer_id()
            && (matched_rule.rule.usage_limit > 0 || matched_rule.rule.total_usage_limit > 0)
        {
            let check =
                usage::check_usage_limits(orders, &matched_rule.rule, &label, customer_id).await?;
            if check == UsageCheck::LimitReached {
                return Ok(DiscountResponse::invalid_coupon(
                    messages::usage_limit_reached(lang),
                    None,
                ));
            }
        }
    }

    response.finalize();
    Ok(response)
}
