use std::net::SocketAddr;
use std::path::PathBuf;

/// Shopify credential set loaded at startup.
///
/// The API key and secret identify the app registration; the access token
/// is what actually authenticates Admin API requests.
#[derive(Clone)]
pub struct ShopCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub shop_name: String,
    pub access_token: String,
}

impl std::fmt::Debug for ShopCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopCredentials")
            .field("shop_name", &self.shop_name)
            .field("api_key", &"[redacted]")
            .field("api_secret", &"[redacted]")
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: ShopCredentials,
    pub api_version: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Inventory locations counted toward exported quantities.
    pub location_ids: Vec<i64>,
    pub page_size: u32,
    pub pass_interval_secs: u64,
    pub working_path: PathBuf,
    pub published_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Pause when fewer than this many calls remain in the API bucket.
    pub bucket_threshold: u32,
    pub bucket_pause_secs: u64,
}
