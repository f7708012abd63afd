//! The evaluation response document.
//!
//! Every field is optional and omitted from the JSON when empty or
//! zero-valued; [`DiscountResponse::finalize`] drops entries that ended
//! the evaluation without an actual value.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::discount::DiscountType;

/// Maximum characters kept from a rule label in the availability preview.
pub const PREVIEW_LABEL_MAX_LEN: usize = 50;

/// Informational preview of the best currently-matchable discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableExtraDiscount {
    /// Rule label, truncated to [`PREVIEW_LABEL_MAX_LEN`] characters.
    pub label: String,
    /// Minimum amount required to unlock the discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    /// Discount type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    /// Discount magnitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
}

/// Running total of every discount event applied to this cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraDiscount {
    /// Accumulated discount amount.
    pub value: Decimal,
    /// Short identifying flags, one per contributing event, capped at 20.
    pub flags: Vec<String>,
}

/// The applied discount block of the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedDiscountRule {
    /// Display label of the winning rule.
    pub label: String,
    /// Display description of the winning rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accumulated discount value and flags.
    pub extra_discount: ExtraDiscount,
}

/// Discount advertised on a buy-together recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferDiscount {
    /// Discount type of the incomplete kit.
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
    /// Discount magnitude of the incomplete kit.
    pub value: Decimal,
}

/// Recommendation of products completing an unmet kit condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyTogetherOffer {
    /// Product id mapped to the quantity to add.
    pub products: BTreeMap<String, u32>,
    /// Discount earned once the kit is complete.
    pub discount: OfferDiscount,
}

/// The discount decision produced for one cart evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DiscountResponse {
    /// Preview of the best matchable discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_extra_discount: Option<AvailableExtraDiscount>,
    /// The actually-applied accumulated discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rule: Option<AppliedDiscountRule>,
    /// Recommendations completing incomplete kits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_together: Option<Vec<BuyTogetherOffer>>,
    /// Products to grant for free.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freebie_product_ids: Option<Vec<String>>,
    /// Localized explanation when the promotion cannot be applied.
    /// Mutually exclusive with a populated `discount_rule`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_coupon_message: Option<String>,
}

impl DiscountResponse {
    /// An ineligibility outcome: the request completes successfully but
    /// no discount is applied. Carries over an already-computed preview.
    #[must_use]
    pub fn invalid_coupon(
        message: String,
        available_extra_discount: Option<AvailableExtraDiscount>,
    ) -> Self {
        Self {
            available_extra_discount,
            invalid_coupon_message: Some(message),
            ..Self::default()
        }
    }

    /// Drop optional blocks that ended the evaluation without a value.
    pub fn finalize(&mut self) {
        if self
            .available_extra_discount
            .as_ref()
            .is_some_and(|preview| !preview.value.is_some_and(|v| v > Decimal::ZERO))
        {
            self.available_extra_discount = None;
        }
        if self
            .discount_rule
            .as_ref()
            .is_some_and(|rule| rule.extra_discount.value <= Decimal::ZERO)
        {
            self.discount_rule = None;
        }
    }
}
