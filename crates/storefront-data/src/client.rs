//! HTTP implementation of [`CommerceApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use storefront_commerce::catalog::Product;
use storefront_commerce::checkout::{OrderReceipt, OrderRequest};

use crate::dto::{ErrorDto, ProductListDto};
use crate::{ApiError, CommerceApi, RetryPolicy, TimeoutConfig};

/// Path of the product list, relative to the API base.
pub const PRODUCTS_PATH: &str = "/product";

/// Path of order submission, relative to the API base.
pub const ORDERS_PATH: &str = "/order";

/// Commerce API client over HTTP.
///
/// Product fetches are retried per the [`RetryPolicy`]; order submission
/// is never retried since it is not idempotent.
#[derive(Debug, Clone)]
pub struct HttpCommerceApi {
    client: Client,
    base_url: String,
    timeout: TimeoutConfig,
    retry: RetryPolicy,
}

impl HttpCommerceApi {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: TimeoutConfig) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let client = Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            retry: RetryPolicy::default(),
        })
    }

    /// Set the retry policy for idempotent calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout.total))?;
        self.decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(&self, url: &str, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout.total))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorDto>(&body)
                .map(|dto| dto.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(ApiError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait(?Send)]
impl CommerceApi for HttpCommerceApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.url(PRODUCTS_PATH);
        let mut attempt = 0;
        loop {
            match self.get_once::<ProductListDto>(&url).await {
                Ok(list) => {
                    tracing::debug!(url = %url, total = list.total, "products fetched");
                    return Ok(list.into_products());
                }
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying product fetch"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        let url = self.url(ORDERS_PATH);
        tracing::debug!(url = %url, items = request.items.len(), total = %request.total, "submitting order");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.timeout.total))?;
        self.decode(&url, response).await
    }
}
