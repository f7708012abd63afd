//! Store API order-history adapter.
//!
//! Implements [`OrderHistory`] by listing orders on the platform Store
//! API, filtered by the discount label recorded under
//! `extra_discount.app.label` (and by buyer for customer-scoped counts).
//! The label filter supports the API's case-sensitive (`=`) and
//! case-insensitive (`%=`) operators.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::form_urlencoded;

use crate::usage::{OrderCountFilter, OrderHistory, OrderHistoryError};

/// One matched order; only the id is requested.
#[derive(Debug, Deserialize)]
struct OrderRef {
    #[serde(rename = "_id")]
    #[allow(dead_code)]
    id: String,
}

/// Orders listing page.
#[derive(Debug, Deserialize)]
struct OrdersPage {
    #[serde(default)]
    result: Vec<OrderRef>,
}

/// Client for the platform Store API.
#[derive(Debug, Clone)]
pub struct StoreApiClient {
    client: reqwest::Client,
    base_url: String,
    store_id: u64,
}

impl StoreApiClient {
    /// Create a new Store API client for one store.
    #[must_use]
    pub fn new(base_url: impl Into<String>, store_id: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store_id,
        }
    }

    /// Build the orders listing URL for a count filter.
    fn orders_url(&self, filter: &OrderCountFilter) -> String {
        let operator = if filter.case_insensitive { "%=" } else { "=" };
        let label: String = form_urlencoded::byte_serialize(filter.label.as_bytes()).collect();
        let mut url = format!(
            "{}/orders.json?fields=_id&extra_discount.app.label{operator}{label}",
            self.base_url
        );
        if let Some(customer_id) = &filter.customer_id {
            let customer_id: String =
                form_urlencoded::byte_serialize(customer_id.as_bytes()).collect();
            url.push_str("&buyers._id=");
            url.push_str(&customer_id);
        }
        url
    }
}

#[async_trait]
impl OrderHistory for StoreApiClient {
    #[instrument(skip(self), fields(store_id = self.store_id))]
    async fn count_orders(&self, filter: &OrderCountFilter) -> Result<u64, OrderHistoryError> {
        let url = self.orders_url(filter);
        let response = self
            .client
            .get(&url)
            .header("X-Store-ID", self.store_id.to_string())
            .send()
            .await
            .map_err(|err| OrderHistoryError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OrderHistoryError::Status(status.as_u16()));
        }

        let page: OrdersPage = response
            .json()
            .await
            .map_err(|err| OrderHistoryError::Request(err.to_string()))?;
        Ok(u64::try_from(page.result.len()).unwrap_or(u64::MAX))
    }
}
