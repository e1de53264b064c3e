//! Authenticated client for the Shopify Admin REST API.

use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use shopfeed_core::AppConfig;

use crate::error::ShopifyError;
use crate::pagination::extract_next_cursor;
use crate::retry::retry_with_backoff;
use crate::throttle::{parse_call_limit, should_pause, CallLimit};
use crate::types::{InventoryLevel, InventoryLevelsResponse, Product, ProductsResponse};

/// Maximum number of listing pages walked in one pass.
/// Prevents infinite loops on cycling cursors.
pub const MAX_PAGES: usize = 200;

/// Response header carrying the call-bucket state, e.g. `"32/40"`.
const CALL_LIMIT_HEADER: &str = "X-Shopify-Shop-Api-Call-Limit";

/// Tunables for timeouts, retries, and the call-bucket throttle.
///
/// [`ClientOptions::default`] mirrors the configuration defaults; production
/// code goes through [`ClientOptions::from_config`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay in seconds for exponential backoff: `base * 2^attempt`.
    pub backoff_base_secs: u64,
    /// Pause when fewer than this many calls remain in the bucket.
    pub bucket_threshold: u32,
    pub bucket_pause_secs: u64,
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
            bucket_threshold: config.bucket_threshold,
            bucket_pause_secs: config.bucket_pause_secs,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "shopfeed/0.1 (catalog-export)".to_owned(),
            max_retries: 3,
            backoff_base_secs: 1,
            bucket_threshold: 5,
            bucket_pause_secs: 3,
        }
    }
}

/// HTTP client for the versioned Admin REST endpoints.
///
/// Handles authentication (`X-Shopify-Access-Token` on every request),
/// rate limiting (reactive bucket throttle plus 429 retry with backoff),
/// and typed error triage for non-2xx responses. Listing responses return
/// the next-page cursor extracted from the `Link` header so callers can
/// drive multi-page fetches.
pub struct ShopifyClient {
    client: Client,
    base_url: Url,
    api_version: String,
    access_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
    bucket_threshold: u32,
    bucket_pause: Duration,
    /// Bucket state from the most recent response, shared across calls.
    last_call_limit: Mutex<Option<CallLimit>>,
}

impl ShopifyClient {
    /// Creates a client pointed at the configured shop's Admin API.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] if the configured shop
    /// name is not a bare myshopify subdomain, or [`ShopifyError::Http`] if
    /// the underlying `reqwest::Client` cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ShopifyError> {
        let base_url = shop_base_url(&config.credentials.shop_name)?;
        Self::with_base_url(
            &base_url,
            &config.credentials.access_token,
            &config.api_version,
            ClientOptions::from_config(config),
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] if `base_url` does not
    /// parse, or [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        api_version: &str,
        options: ClientOptions,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| ShopifyError::InvalidShopDomain {
            shop: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_version: api_version.to_owned(),
            access_token: access_token.to_owned(),
            max_retries: options.max_retries,
            backoff_base_secs: options.backoff_base_secs,
            bucket_threshold: options.bucket_threshold,
            bucket_pause: Duration::from_secs(options.bucket_pause_secs),
            last_call_limit: Mutex::new(None),
        })
    }

    /// Fetches one page of the product listing, with automatic retry on
    /// transient errors.
    ///
    /// Returns the page's products and the cursor for the next page, or
    /// `None` for the cursor on the last page.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ShopifyError::NotFound`] — HTTP 404 (not retried).
    /// - [`ShopifyError::UnexpectedStatus`] — any other non-2xx status (not retried).
    /// - [`ShopifyError::Http`] — network or TLS failure after all retries exhausted.
    /// - [`ShopifyError::Deserialize`] — response body does not match the
    ///   expected shape (not retried).
    pub async fn list_products_page(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(Vec<Product>, Option<String>), ShopifyError> {
        let limit_value = limit.to_string();
        let mut params = vec![("limit", limit_value.as_str())];
        if let Some(cursor) = page_info {
            params.push(("page_info", cursor));
        }
        let url = self.endpoint_url("products.json", &params);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.send(&url).await?;

                // The Link header must be read before the body consumes
                // the response.
                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ProductsResponse>(&body).map_err(|e| {
                    ShopifyError::Deserialize {
                        context: "products page".to_owned(),
                        source: e,
                    }
                })?;

                Ok((
                    parsed.products,
                    extract_next_cursor(link_header.as_deref()),
                ))
            }
        })
        .await
    }

    /// Fetches inventory levels for one inventory item, filtered to the
    /// given locations.
    ///
    /// A single page always suffices: the endpoint returns at most one
    /// record per requested location, and the allow-list is far below the
    /// 250-record page cap.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::list_products_page`].
    pub async fn inventory_levels(
        &self,
        inventory_item_id: i64,
        location_ids: &[i64],
    ) -> Result<Vec<InventoryLevel>, ShopifyError> {
        let item = inventory_item_id.to_string();
        let locations = location_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint_url(
            "inventory_levels.json",
            &[
                ("inventory_item_ids", item.as_str()),
                ("location_ids", locations.as_str()),
                ("limit", "250"),
            ],
        );

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.send(&url).await?;
                let body = response.text().await?;
                let parsed =
                    serde_json::from_str::<InventoryLevelsResponse>(&body).map_err(|e| {
                        ShopifyError::Deserialize {
                            context: format!("inventory levels for item {inventory_item_id}"),
                            source: e,
                        }
                    })?;
                Ok(parsed.inventory_levels)
            }
        })
        .await
    }

    /// Fetches the complete catalog by walking all listing pages.
    ///
    /// Starts with the first page (no cursor), follows `Link` header
    /// cursors until no `rel="next"` link remains, and returns every
    /// product along with the number of pages walked.
    ///
    /// All-or-nothing: on any page failure, products from earlier pages
    /// are discarded and the error is returned — a partial catalog would
    /// publish an export missing products that are still for sale.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::list_products_page`], and returns
    /// [`ShopifyError::PaginationLimit`] if the walk exceeds [`MAX_PAGES`].
    pub async fn fetch_all_products(
        &self,
        limit: u32,
    ) -> Result<(Vec<Product>, usize), ShopifyError> {
        let mut all_products: Vec<Product> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let (products, next) = self.list_products_page(limit, cursor.as_deref()).await?;
            tracing::debug!(
                page = pages,
                products = products.len(),
                "fetched catalog page"
            );
            all_products.extend(products);

            cursor = next;
            if cursor.is_none() {
                break;
            }
        }

        Ok((all_products, pages))
    }

    /// Bucket state from the most recent response, if any has been seen.
    #[must_use]
    pub fn last_call_limit(&self) -> Option<CallLimit> {
        match self.last_call_limit.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Sends one authenticated GET, throttling beforehand and recording the
    /// bucket state afterward. Non-2xx statuses become typed errors.
    async fn send(&self, url: &Url) -> Result<reqwest::Response, ShopifyError> {
        self.pause_if_depleted().await;

        let response = self
            .client
            .get(url.clone())
            .header("X-Shopify-Access-Token", &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        self.record_call_limit(response.headers());

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(2);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Pauses for the configured interval when the last-observed bucket has
    /// fewer than `bucket_threshold` calls remaining.
    async fn pause_if_depleted(&self) {
        let limit = match self.last_call_limit.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };

        if let Some(limit) = limit {
            if should_pause(limit.capacity, limit.consumed, self.bucket_threshold) {
                tracing::debug!(
                    consumed = limit.consumed,
                    capacity = limit.capacity,
                    pause_secs = self.bucket_pause.as_secs(),
                    "call bucket nearly depleted — pausing"
                );
                tokio::time::sleep(self.bucket_pause).await;
            }
        }
    }

    fn record_call_limit(&self, headers: &reqwest::header::HeaderMap) {
        let Some(limit) = headers
            .get(CALL_LIMIT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_call_limit)
        else {
            return;
        };

        match self.last_call_limit.lock() {
            Ok(mut guard) => *guard = Some(limit),
            Err(poisoned) => *poisoned.into_inner() = Some(limit),
        }
    }

    /// Builds a versioned Admin API URL with encoded query parameters.
    fn endpoint_url(&self, resource: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("admin/api/{}/{resource}", self.api_version));
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// Validates a shop name and formats its Admin API base URL.
///
/// Shop names are bare myshopify subdomains (`"my-shop"`, not a full URL).
fn shop_base_url(shop: &str) -> Result<String, ShopifyError> {
    let valid =
        !shop.is_empty() && shop.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(ShopifyError::InvalidShopDomain {
            shop: shop.to_owned(),
            reason: "expected a bare myshopify subdomain (letters, digits, dashes)".to_owned(),
        });
    }
    Ok(format!("https://{shop}.myshopify.com"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> ShopifyClient {
        ShopifyClient::with_base_url(base_url, "test-token", "2024-01", ClientOptions::default())
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_url_without_cursor() {
        let client = test_client("https://demo.myshopify.com");
        let url = client.endpoint_url("products.json", &[("limit", "250")]);
        assert_eq!(
            url.as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/products.json?limit=250"
        );
    }

    #[test]
    fn endpoint_url_with_cursor() {
        let client = test_client("https://demo.myshopify.com");
        let url = client.endpoint_url(
            "products.json",
            &[("limit", "250"), ("page_info", "eyJsYXN0X2lkIjo2fQ")],
        );
        assert_eq!(
            url.as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ"
        );
    }

    #[test]
    fn endpoint_url_percent_encodes_parameter_values() {
        let client = test_client("https://demo.myshopify.com");
        let url = client.endpoint_url("inventory_levels.json", &[("location_ids", "1,2,3")]);
        assert_eq!(
            url.as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/inventory_levels.json?location_ids=1%2C2%2C3"
        );
    }

    #[test]
    fn endpoint_url_respects_custom_base() {
        let client = test_client("http://127.0.0.1:9999");
        let url = client.endpoint_url("products.json", &[("limit", "50")]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/admin/api/2024-01/products.json?limit=50"
        );
    }

    #[test]
    fn shop_base_url_formats_subdomain() {
        assert_eq!(
            shop_base_url("my-shop").expect("valid shop"),
            "https://my-shop.myshopify.com"
        );
    }

    #[test]
    fn shop_base_url_rejects_full_urls() {
        let err = shop_base_url("https://my-shop.myshopify.com").expect_err("should reject");
        assert!(matches!(err, ShopifyError::InvalidShopDomain { .. }));
    }

    #[test]
    fn shop_base_url_rejects_empty_name() {
        assert!(matches!(
            shop_base_url(""),
            Err(ShopifyError::InvalidShopDomain { .. })
        ));
    }
}
