//! Single-rule matching by request signal precedence.
//!
//! Precedence is fixed: coupon code, then UTM campaign, then customer
//! identity, then open promotions. A request carrying a coupon never
//! falls back to the later signals - a bad coupon is a bad coupon even
//! when an open promotion would have matched.

use promo_core::{MatchKind, RequestParams};

use super::validate::ValidatedRule;

/// Outcome of matching: the selected kind always, the rule when found.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a> {
    /// The winning rule, absent when the signal matched nothing.
    pub rule: Option<&'a ValidatedRule>,
    /// Which signal was used for matching.
    pub kind: MatchKind,
}

/// Compare two codes honoring the rule's case-insensitivity flag.
fn code_matches(rule_code: Option<&str>, request_code: &str, case_insensitive: bool) -> bool {
    rule_code.is_some_and(|code| {
        if case_insensitive {
            code.to_uppercase() == request_code.to_uppercase()
        } else {
            code == request_code
        }
    })
}

/// Select exactly one rule for the request, first precedence level that
/// applies wins.
#[must_use]
pub fn match_rule<'a>(rules: &'a [ValidatedRule], params: &RequestParams) -> RuleMatch<'a> {
    if let Some(coupon) = params.discount_coupon.as_deref() {
        // Coupon requests match only by coupon; no fallback.
        return RuleMatch {
            rule: rules.iter().find(|r| {
                code_matches(r.rule.discount_coupon.as_deref(), coupon, r.rule.case_insensitive)
            }),
            kind: MatchKind::Coupon,
        };
    }

    if let Some(campaign) = params.utm_campaign() {
        let rule = rules.iter().find(|r| {
            code_matches(r.rule.utm_campaign.as_deref(), campaign, r.rule.case_insensitive)
        });
        if rule.is_some() {
            return RuleMatch {
                rule,
                kind: MatchKind::Utm,
            };
        }
    }

    if let Some(customer_id) = params.customer_id() {
        let rule = rules
            .iter()
            .find(|r| r.rule.customer_ids.iter().any(|id| id == customer_id));
        if rule.is_some() {
            return RuleMatch {
                rule,
                kind: MatchKind::Customer,
            };
        }
    }

    RuleMatch {
        rule: rules.iter().find(|r| super::predicates::open_promotion(&r.rule)),
        kind: MatchKind::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promo_core::{Customer, DiscountRule, DiscountSpec, Utm};
    use rust_decimal::Decimal;

    fn validated(rule: DiscountRule) -> ValidatedRule {
        let spec = rule
            .discount
            .clone()
            .unwrap_or_else(|| DiscountSpec::fixed(Decimal::ONE));
        ValidatedRule {
            rule,
            configured: spec.clone(),
            resolved: spec,
        }
    }

    fn coupon_rule(code: &str, case_insensitive: bool) -> ValidatedRule {
        validated(DiscountRule {
            discount_coupon: Some(code.to_string()),
            case_insensitive,
            ..DiscountRule::default()
        })
    }

    fn utm_rule(campaign: &str) -> ValidatedRule {
        validated(DiscountRule {
            utm_campaign: Some(campaign.to_string()),
            ..DiscountRule::default()
        })
    }

    fn params_with_coupon(code: &str) -> RequestParams {
        RequestParams {
            discount_coupon: Some(code.to_string()),
            ..RequestParams::default()
        }
    }

    #[test]
    fn test_coupon_wins_over_utm_regardless_of_rule_order() {
        let rules = vec![utm_rule("summer"), coupon_rule("SAVE", false)];
        let params = RequestParams {
            utm: Some(Utm {
                campaign: Some("summer".to_string()),
            }),
            ..params_with_coupon("SAVE")
        };
        let matched = match_rule(&rules, &params);
        assert_eq!(matched.kind, MatchKind::Coupon);
        assert_eq!(
            matched.rule.and_then(|r| r.rule.discount_coupon.as_deref()),
            Some("SAVE")
        );
    }

    #[test]
    fn test_unknown_coupon_does_not_fall_back() {
        let rules = vec![validated(DiscountRule::default())];
        let matched = match_rule(&rules, &params_with_coupon("NOPE"));
        assert_eq!(matched.kind, MatchKind::Coupon);
        assert!(matched.rule.is_none());
    }

    #[test]
    fn test_coupon_case_sensitivity_per_rule() {
        let rules = vec![coupon_rule("save10", false)];
        assert!(match_rule(&rules, &params_with_coupon("SAVE10")).rule.is_none());

        let rules = vec![coupon_rule("save10", true)];
        assert!(match_rule(&rules, &params_with_coupon("SAVE10")).rule.is_some());
    }

    #[test]
    fn test_utm_then_customer_then_open() {
        let open = validated(DiscountRule {
            label: Some("open".to_string()),
            ..DiscountRule::default()
        });
        let customer = validated(DiscountRule {
            customer_ids: vec!["c1".to_string()],
            ..DiscountRule::default()
        });
        let rules = vec![customer, utm_rule("spring"), open];

        let by_utm = match_rule(
            &rules,
            &RequestParams {
                utm: Some(Utm {
                    campaign: Some("spring".to_string()),
                }),
                ..RequestParams::default()
            },
        );
        assert_eq!(by_utm.kind, MatchKind::Utm);

        let by_customer = match_rule(
            &rules,
            &RequestParams {
                customer: Some(Customer {
                    id: "c1".to_string(),
                }),
                ..RequestParams::default()
            },
        );
        assert_eq!(by_customer.kind, MatchKind::Customer);

        let by_open = match_rule(&rules, &RequestParams::default());
        assert_eq!(by_open.kind, MatchKind::Open);
        assert_eq!(
            by_open.rule.and_then(|r| r.rule.label.as_deref()),
            Some("open")
        );
    }

    #[test]
    fn test_unmatched_utm_falls_through_to_open() {
        let open = validated(DiscountRule::default());
        let rules = vec![open];
        let matched = match_rule(
            &rules,
            &RequestParams {
                utm: Some(Utm {
                    campaign: Some("unknown".to_string()),
                }),
                ..RequestParams::default()
            },
        );
        assert_eq!(matched.kind, MatchKind::Open);
        assert!(matched.rule.is_some());
    }
}
