//! HTTP client for the storefront backend with dependency tagging.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use cart_commerce::catalog::{Product, StockRecord};
use cart_commerce::lookup::{ProductLookup, StockLookup};
use cart_commerce::{LookupError, ProductId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// Convert into the lookup port's error for `product_id`.
    ///
    /// A 404 means the backend does not know the product.
    pub fn into_lookup(self, product_id: ProductId) -> LookupError {
        match self {
            FetchError::Http { status: 404, .. } => LookupError::UnknownProduct(product_id),
            FetchError::Deserialization(msg) => LookupError::Malformed(msg),
            other => LookupError::Unavailable(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// Stock endpoint body. The id is taken from the request path.
#[derive(Debug, Deserialize)]
struct StockBody {
    amount: i64,
}

/// Client for the storefront REST backend.
///
/// Serves `GET {base}/stock/{id}` as [`StockLookup`] and
/// `GET {base}/products/{id}` as [`ProductLookup`], each under its own
/// timeout and retry policy. Responses are never cached.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    inventory: FetchPolicy,
    catalog: FetchPolicy,
}

impl ApiClient {
    /// Create a client for `base_url` with per-tag default policies.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let inventory = FetchPolicy::from_tag(DependencyTag::Inventory);
        let catalog = FetchPolicy::from_tag(DependencyTag::Catalog);
        let connect = inventory.timeout.connect.max(catalog.timeout.connect);
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            inventory,
            catalog,
        })
    }

    /// Override the policy for one dependency.
    pub fn with_policy(mut self, tag: DependencyTag, policy: FetchPolicy) -> Self {
        match tag {
            DependencyTag::Inventory => self.inventory = policy,
            DependencyTag::Catalog => self.catalog = policy,
        }
        self
    }

    /// Use the same total timeout for every dependency.
    pub fn with_timeout(mut self, total: Duration) -> Self {
        self.inventory.timeout = TimeoutConfig::from_total(total);
        self.catalog.timeout = TimeoutConfig::from_total(total);
        self
    }

    /// Retry failed requests up to `max_retries` times.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.inventory.retry = RetryPolicy::new(max_retries);
        self.catalog.retry = self.inventory.retry.clone();
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Policy in effect for a dependency.
    pub fn policy(&self, tag: DependencyTag) -> &FetchPolicy {
        match tag {
            DependencyTag::Inventory => &self.inventory,
            DependencyTag::Catalog => &self.catalog,
        }
    }

    /// Fetch `path` relative to the base URL, applying the tag's policy.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        let policy = self.policy(tag);
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut attempt = 0;
        loop {
            let started = Instant::now();
            match self.fetch_once(&url, policy.timeout.total).await {
                Ok(value) => {
                    debug!(
                        dependency = %tag,
                        url = %url,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Fetch succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if policy.retry.should_retry(&e, attempt) => {
                    let delay = policy.retry.backoff.delay_for_attempt(attempt);
                    warn!(
                        dependency = %tag,
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(dependency = %tag, url = %url, attempt, error = %e, "Fetch failed");
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_once<T: DeserializeOwned>(
        &self,
        url: &str,
        total: Duration,
    ) -> Result<T, FetchError> {
        let request = async {
            let resp = self.client.get(url).send().await?;

            let status = resp.status();
            if status.is_client_error() || status.is_server_error() {
                return Err(FetchError::Http {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let bytes = resp.bytes().await?;
            serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization(e.to_string()))
        };

        match tokio::time::timeout(total, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(format!(
                "{url} did not answer within {}ms",
                total.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl StockLookup for ApiClient {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, LookupError> {
        let body: StockBody = self
            .fetch(&format!("stock/{product_id}"), DependencyTag::Inventory)
            .await
            .map_err(|e| e.into_lookup(product_id))?;
        Ok(StockRecord::new(product_id, body.amount))
    }
}

#[async_trait]
impl ProductLookup for ApiClient {
    async fn product(&self, product_id: ProductId) -> Result<Product, LookupError> {
        self.fetch(&format!("products/{product_id}"), DependencyTag::Catalog)
            .await
            .map_err(|e| e.into_lookup(product_id))
    }
}
