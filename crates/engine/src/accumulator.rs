//! Single funnel for every discount event.
//!
//! Kit discounts, freebie values, and the matched promotional rule all
//! flow through [`Accumulator::add`], which caps each event against its
//! amount basis and merges it into the response's `discount_rule` block.

use promo_core::{
    AmountField, Amounts, AppliedDiscountRule, DiscountResponse, DiscountSpec, ExtraDiscount,
};
use rust_decimal::Decimal;

/// Flags stored per accumulated discount; later events still add their
/// value but stop being individually identified.
const MAX_FLAGS: usize = 20;

/// Accumulates capped discount events into a response document.
pub struct Accumulator<'a> {
    response: &'a mut DiscountResponse,
    amounts: Option<&'a Amounts>,
}

impl<'a> Accumulator<'a> {
    /// Wrap a response under construction.
    pub fn new(response: &'a mut DiscountResponse, amounts: Option<&'a Amounts>) -> Self {
        Self { response, amounts }
    }

    /// The response being built.
    #[must_use]
    pub fn response(&mut self) -> &mut DiscountResponse {
        self.response
    }

    /// Apply one discount event.
    ///
    /// Without an explicit `cap`, the basis defaults to the request
    /// amount named by the spec's `apply_at` field (`total` when unset).
    /// The event value is clamped to the cap; a missing or non-positive
    /// basis yields no discount. Returns whether a nonzero discount was
    /// actually added.
    pub fn add(
        &mut self,
        discount: &DiscountSpec,
        flag: &str,
        label: Option<&str>,
        cap: Option<Decimal>,
    ) -> bool {
        let cap = cap.or_else(|| {
            self.amounts
                .and_then(|amounts| amounts.get(discount.apply_at.unwrap_or(AmountField::Total)))
        });
        let Some(cap) = cap.filter(|cap| *cap > Decimal::ZERO) else {
            return false;
        };

        let value = discount.value_against(cap).min(cap);
        if value <= Decimal::ZERO {
            return false;
        }

        tracing::debug!(%flag, %value, "discount event accumulated");
        if let Some(applied) = &mut self.response.discount_rule {
            applied.extra_discount.value += value;
            if applied.extra_discount.flags.len() < MAX_FLAGS {
                applied.extra_discount.flags.push(flag.to_string());
            }
        } else {
            self.response.discount_rule = Some(AppliedDiscountRule {
                label: label.unwrap_or(flag).to_string(),
                description: None,
                extra_discount: ExtraDiscount {
                    value,
                    flags: vec![flag.to_string()],
                },
            });
        }
        true
    }
}
