//! The evaluation request document.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::cart::RequestParams;

/// Merchant app installation data as received on the request.
///
/// `data` holds admin-visible settings, `hidden_data` holds settings
/// written through the management API. The engine merges the two with
/// `hidden_data` winning, then interprets the reserved catalog fields
/// (`discount_rules`, `product_kit_discounts`, `freebies_rules`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Application {
    /// Admin-configured settings.
    pub data: Option<Map<String, Value>>,
    /// API-configured settings; take precedence over `data`.
    pub hidden_data: Option<Map<String, Value>>,
}

/// A full cart-evaluation request: cart context plus merchant config.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DiscountRequest {
    /// Cart snapshot and customer signals.
    pub params: RequestParams,
    /// Merchant app installation copy.
    pub application: Application,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_document_shape() {
        let request: DiscountRequest = serde_json::from_value(serde_json::json!({
            "params": {
                "discount_coupon": "WELCOME",
                "amount": { "total": 100 }
            },
            "application": {
                "data": { "discount_rules": [] },
                "hidden_data": { "MYCOUPON": { "discount": { "value": 5 } } }
            }
        }))
        .expect("valid request");
        assert_eq!(request.params.discount_coupon.as_deref(), Some("WELCOME"));
        assert!(request.application.data.is_some());
        assert!(
            request
                .application
                .hidden_data
                .as_ref()
                .is_some_and(|h| h.contains_key("MYCOUPON"))
        );
    }
}
