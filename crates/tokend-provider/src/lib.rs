//! # tokend Provider
//!
//! Chain API client for the tokend token client. Talks to the HTTP API of
//! Antelope nodes (`/v1/chain/*`) with connection reuse, request rate
//! limiting, endpoint health tracking and failover to fallback nodes.
//!
//! Non-success responses are mapped onto [`TokenError`]: structured node
//! error bodies become [`TokenError::ApiError`], other HTTP failures become
//! [`TokenError::RpcRequestError`], and transport failures become
//! [`TokenError::RpcConnectionError`] or [`TokenError::NetworkTimeout`].
//!
//! ## Example
//!
//! ```ignore
//! use tokend_provider::{presets, ChainApi, GetTableRowsParams};
//!
//! let api = ChainApi::with_config(presets::jungle4())?;
//! let info = api.get_info().await?;
//! println!("head block {}", info.head_block_num);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;

pub use api::{
    ApiErrorBody, ApiErrorDetail, ApiErrorMessage, GetInfo, GetTableRowsParams, TableRows,
    GET_INFO, GET_TABLE_ROWS,
};

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokend_error::{Result, TokenError};
use tokio::sync::RwLock;
use url::Url;

/// Configuration for a chain API endpoint set
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Primary API URL
    pub url: String,
    /// Fallback URLs, tried in order when the current endpoint fails
    pub fallback_urls: Vec<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Client-side rate limit, `None` to disable
    pub rate_limit: Option<RateLimitConfig>,
}

impl ProviderConfig {
    /// Creates a new provider configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fallback_urls: Vec::new(),
            timeout_secs: 30,
            rate_limit: Some(RateLimitConfig::default()),
        }
    }

    /// Adds a fallback URL
    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback_urls.push(url.into());
        self
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the client-side rate limit
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Disables client-side rate limiting
    pub fn without_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        for url in self.all_urls() {
            let parsed = Url::parse(url)
                .map_err(|e| TokenError::ConfigError(format!("invalid URL '{}': {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(TokenError::ConfigError(format!(
                    "unsupported URL scheme '{}' in '{}'",
                    parsed.scheme(),
                    url
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(TokenError::ConfigError("timeout must be non-zero".into()));
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.quota()?;
        }
        Ok(())
    }

    /// Returns all URLs (primary + fallbacks)
    pub fn all_urls(&self) -> Vec<&str> {
        let mut urls = vec![self.url.as_str()];
        urls.extend(self.fallback_urls.iter().map(|s| s.as_str()));
        urls
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8888")
    }
}

/// Health status of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointHealth {
    /// Endpoint is healthy
    Healthy,
    /// Endpoint is slow or failing intermittently
    Degraded,
    /// Endpoint is failing most requests
    Unhealthy,
    /// No requests made yet
    Unknown,
}

/// Request statistics of one endpoint
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// The endpoint URL
    pub url: String,
    /// Current health status
    pub health: EndpointHealth,
    /// Last successful request time
    pub last_success: Option<Instant>,
    /// Last failed request time
    pub last_failure: Option<Instant>,
    /// Total requests made
    pub total_requests: u64,
    /// Total failures
    pub total_failures: u64,
    /// Average response time in milliseconds
    pub avg_response_ms: u64,
}

impl EndpointInfo {
    fn new(url: String) -> Self {
        Self {
            url,
            health: EndpointHealth::Unknown,
            last_success: None,
            last_failure: None,
            total_requests: 0,
            total_failures: 0,
            avg_response_ms: 0,
        }
    }

    fn record_success(&mut self, response_time_ms: u64) {
        self.last_success = Some(Instant::now());
        self.total_requests += 1;
        let successes = self.total_requests - self.total_failures;
        self.avg_response_ms =
            (self.avg_response_ms * (successes - 1) + response_time_ms) / successes;
        self.health = if self.failure_rate() > 0.2 || self.avg_response_ms >= 1000 {
            EndpointHealth::Degraded
        } else {
            EndpointHealth::Healthy
        };
    }

    fn record_failure(&mut self) {
        self.last_failure = Some(Instant::now());
        self.total_requests += 1;
        self.total_failures += 1;

        let failure_rate = self.failure_rate();
        if failure_rate > 0.5 {
            self.health = EndpointHealth::Unhealthy;
        } else if failure_rate > 0.2 {
            self.health = EndpointHealth::Degraded;
        }
    }

    fn failure_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_failures as f64 / self.total_requests as f64
        }
    }

    /// Returns the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        1.0 - self.failure_rate()
    }
}

/// Endpoint set with health tracking and failover
#[derive(Debug)]
pub struct ManagedProvider {
    config: ProviderConfig,
    endpoints: RwLock<Vec<EndpointInfo>>,
    current_endpoint_idx: RwLock<usize>,
}

impl ManagedProvider {
    /// Creates a new managed provider
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let endpoints = config
            .all_urls()
            .into_iter()
            .map(|url| EndpointInfo::new(url.to_string()))
            .collect();

        Ok(Self {
            config,
            endpoints: RwLock::new(endpoints),
            current_endpoint_idx: RwLock::new(0),
        })
    }

    /// The configuration this provider was built from
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the current active endpoint URL
    pub async fn current_url(&self) -> String {
        let idx = *self.current_endpoint_idx.read().await;
        let endpoints = self.endpoints.read().await;
        endpoints
            .get(idx)
            .map(|e| e.url.clone())
            .unwrap_or_else(|| self.config.url.clone())
    }

    /// Records a successful request against `url`
    pub async fn record_success(&self, url: &str, response_time_ms: u64) {
        let mut endpoints = self.endpoints.write().await;
        if let Some(endpoint) = endpoints.iter_mut().find(|e| e.url == url) {
            endpoint.record_success(response_time_ms);
        }
    }

    /// Records a failed request against `url` and fails over if it is current
    pub async fn record_failure(&self, url: &str) {
        let mut idx = self.current_endpoint_idx.write().await;
        let mut endpoints = self.endpoints.write().await;

        if let Some(endpoint) = endpoints.iter_mut().find(|e| e.url == url) {
            let was_unhealthy = endpoint.health == EndpointHealth::Unhealthy;
            endpoint.record_failure();
            if !was_unhealthy && endpoint.health == EndpointHealth::Unhealthy {
                tracing::warn!(
                    "Endpoint {} marked unhealthy ({} of {} requests failed)",
                    endpoint.url,
                    endpoint.total_failures,
                    endpoint.total_requests
                );
            }
        }
        if endpoints.get(*idx).map(|e| e.url.as_str()) != Some(url) {
            return;
        }

        let num_endpoints = endpoints.len();
        for i in 1..num_endpoints {
            let next_idx = (*idx + i) % num_endpoints;
            if endpoints[next_idx].health != EndpointHealth::Unhealthy {
                tracing::info!(
                    "Failing over from {} to {}",
                    endpoints[*idx].url,
                    endpoints[next_idx].url
                );
                *idx = next_idx;
                return;
            }
        }
    }

    /// Returns endpoint statistics
    pub async fn stats(&self) -> Vec<EndpointInfo> {
        self.endpoints.read().await.clone()
    }
}

// ============================================================================
// HTTP client
// ============================================================================

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
    /// Idle connection timeout
    pub pool_idle_timeout_secs: u64,
    /// Connection timeout
    pub connect_timeout_secs: u64,
    /// Request timeout
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
    /// Enable gzip compression
    pub gzip: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            pool_idle_timeout_secs: 90,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            user_agent: format!("tokend/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
        }
    }
}

impl HttpClientConfig {
    fn build(&self) -> Result<Client> {
        Client::builder()
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(self.pool_idle_timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .user_agent(&self.user_agent)
            .gzip(self.gzip)
            .build()
            .map_err(|e| TokenError::ConfigError(format!("failed to build HTTP client: {}", e)))
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: u32,
    /// Burst size (max requests in a burst)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 20,
        }
    }
}

impl RateLimitConfig {
    fn quota(&self) -> Result<Quota> {
        let per_second = NonZeroU32::new(self.requests_per_second).ok_or_else(|| {
            TokenError::ConfigError("requests_per_second must be non-zero".into())
        })?;
        let burst = NonZeroU32::new(self.burst_size)
            .ok_or_else(|| TokenError::ConfigError("burst_size must be non-zero".into()))?;
        Ok(Quota::per_second(per_second).allow_burst(burst))
    }
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client for the chain API of one endpoint set
pub struct ChainApi {
    managed: ManagedProvider,
    client: Client,
    rate_limiter: Option<DirectLimiter>,
    request_count: AtomicU64,
    timeout_secs: u64,
}

impl ChainApi {
    /// Creates a client for a single endpoint with default settings
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(ProviderConfig::new(url))
    }

    /// Creates a client from a provider configuration
    pub fn with_config(config: ProviderConfig) -> Result<Self> {
        let http_config = HttpClientConfig {
            request_timeout_secs: config.timeout_secs,
            ..Default::default()
        };
        Self::with_client_config(config, http_config)
    }

    /// Creates a client with explicit HTTP client settings
    pub fn with_client_config(
        config: ProviderConfig,
        http_config: HttpClientConfig,
    ) -> Result<Self> {
        let rate_limiter = match &config.rate_limit {
            Some(rate_limit) => Some(RateLimiter::direct(rate_limit.quota()?)),
            None => None,
        };
        let timeout_secs = http_config.request_timeout_secs;
        let managed = ManagedProvider::new(config)?;
        let client = http_config.build()?;

        Ok(Self {
            managed,
            client,
            rate_limiter,
            request_count: AtomicU64::new(0),
            timeout_secs,
        })
    }

    /// Returns the current active endpoint URL
    pub async fn current_url(&self) -> String {
        self.managed.current_url().await
    }

    /// POSTs `body` to `path` on the current endpoint, failing over once on
    /// transport-level errors
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.managed.current_url().await;
        match self.post_to(&url, path, body).await {
            Err(e) if e.is_retryable() => {
                let new_url = self.managed.current_url().await;
                if new_url != url {
                    tracing::info!("Retrying {} with failover endpoint: {}", path, new_url);
                    self.post_to(&new_url, path, body).await
                } else {
                    Err(e)
                }
            }
            result => result,
        }
    }

    async fn post_to<B, R>(&self, base: &str, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let start = Instant::now();
        let result = self.send(base, path, body).await;
        let endpoint_failed = match &result {
            Err(e) if e.is_retryable() => {
                tracing::debug!(endpoint = %base, path, error = %e, "chain API request failed");
                true
            }
            _ => false,
        };
        if endpoint_failed {
            self.managed.record_failure(base).await;
        } else {
            let elapsed = start.elapsed().as_millis() as u64;
            self.managed.record_success(base, elapsed).await;
        }
        result
    }

    async fn send<B, R>(&self, base: &str, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        tracing::debug!(%url, "chain API request");
        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(text) = serde_json::to_string(body) {
                tracing::trace!(%url, body = %text, "chain API request body");
            }
        }

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(base, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1);
            return Err(TokenError::RateLimited { retry_after_secs });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(base, e))?;

        if !status.is_success() {
            if let Ok(body) = serde_json::from_slice::<ApiErrorBody>(&bytes) {
                return Err(TokenError::ApiError {
                    code: body.error.code,
                    message: body.best_message(),
                    name: body.error.name,
                });
            }
            return Err(TokenError::RpcRequestError {
                endpoint: path.to_string(),
                status: status.as_u16(),
                reason: String::from_utf8_lossy(&bytes).chars().take(256).collect(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| TokenError::JsonError(e.to_string()))
    }

    fn transport_error(&self, base: &str, error: reqwest::Error) -> TokenError {
        if error.is_timeout() {
            TokenError::NetworkTimeout {
                seconds: self.timeout_secs,
            }
        } else {
            TokenError::RpcConnectionError {
                url: base.to_string(),
                reason: error.to_string(),
            }
        }
    }

    /// Fetches chain and head block information
    pub async fn get_info(&self) -> Result<GetInfo> {
        self.post(GET_INFO, &serde_json::json!({})).await
    }

    /// Reads rows of a contract table
    pub async fn get_table_rows<T>(&self, params: &GetTableRowsParams) -> Result<TableRows<T>>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(
            code = %params.code,
            scope = %params.scope,
            table = %params.table,
            lower_bound = ?params.lower_bound,
            "get_table_rows"
        );
        self.post(GET_TABLE_ROWS, params).await
    }

    /// Returns endpoint statistics
    pub async fn stats(&self) -> Vec<EndpointInfo> {
        self.managed.stats().await
    }

    /// Returns the number of requests sent
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ChainApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainApi")
            .field("urls", &self.managed.config().all_urls())
            .field("request_count", &self.request_count())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish()
    }
}

/// Provider presets for public networks
pub mod presets {
    use super::ProviderConfig;

    /// EOS mainnet
    pub fn eos_mainnet() -> ProviderConfig {
        ProviderConfig::new("https://eos.greymass.com")
            .with_fallback("https://eos.api.eosnation.io")
            .with_timeout(30)
    }

    /// Jungle 4 testnet
    pub fn jungle4() -> ProviderConfig {
        ProviderConfig::new("https://jungle4.greymass.com")
            .with_fallback("https://jungle4.api.eosnation.io")
            .with_timeout(30)
    }

    /// WAX mainnet
    pub fn wax_mainnet() -> ProviderConfig {
        ProviderConfig::new("https://wax.greymass.com")
            .with_fallback("https://api.waxsweden.org")
            .with_timeout(30)
    }

    /// Telos mainnet
    pub fn telos_mainnet() -> ProviderConfig {
        ProviderConfig::new("https://telos.greymass.com")
            .with_fallback("https://mainnet.telos.net")
            .with_timeout(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokend_types::Name;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn info_body() -> serde_json::Value {
        serde_json::json!({
            "server_version": "d133c641",
            "chain_id": "73e4385a2708e6d7048834fbc1079f2fabb17b3c125b146af438971e90716c4d",
            "head_block_num": 1000,
            "last_irreversible_block_num": 670,
            "head_block_id": "000003e8b4c8bbd1a8ac36a77bb46e6de11c25a9fa3d6c3c3c0a8fa23f9cd1f4",
            "head_block_time": "2026-01-01T00:00:00.000",
            "head_block_producer": "eosio"
        })
    }

    fn unlimited(url: &str) -> ProviderConfig {
        ProviderConfig::new(url).without_rate_limit()
    }

    #[test]
    fn test_provider_config() {
        let config = ProviderConfig::new("https://eos.greymass.com")
            .with_fallback("https://eos.api.eosnation.io")
            .with_timeout(60);

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.all_urls().len(), 2);
        assert!(config.rate_limit.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ProviderConfig::new("not-a-valid-url").validate(),
            Err(TokenError::ConfigError(_))
        ));
        assert!(ProviderConfig::new("ftp://example.com").validate().is_err());
        assert!(ProviderConfig::new("https://example.com")
            .with_timeout(0)
            .validate()
            .is_err());
        assert!(ProviderConfig::new("https://example.com")
            .with_rate_limit(RateLimitConfig {
                requests_per_second: 0,
                burst_size: 1,
            })
            .validate()
            .is_err());
    }

    #[test]
    fn test_endpoint_info() {
        let mut info = EndpointInfo::new("https://example.com".into());
        assert_eq!(info.health, EndpointHealth::Unknown);
        assert_eq!(info.success_rate(), 1.0);

        info.record_success(100);
        assert_eq!(info.health, EndpointHealth::Healthy);
        assert_eq!(info.total_requests, 1);

        info.record_failure();
        assert_eq!(info.total_failures, 1);
        assert_eq!(info.success_rate(), 0.5);
    }

    #[test]
    fn test_endpoint_health_tracking() {
        let mut info = EndpointInfo::new("https://example.com".into());
        for i in 0..10 {
            info.record_success(100 + i * 10);
        }
        assert_eq!(info.total_failures, 0);
        assert_eq!(info.health, EndpointHealth::Healthy);
        assert!(info.avg_response_ms > 0);

        for _ in 0..5 {
            info.record_failure();
        }
        assert_eq!(info.total_requests, 15);
        // 5/15 failures
        assert_eq!(info.health, EndpointHealth::Degraded);
    }

    #[tokio::test]
    async fn test_managed_provider_failover() {
        let config = ProviderConfig::new("https://primary.example.com")
            .with_fallback("https://fallback.example.com");
        let provider = ManagedProvider::new(config).unwrap();
        assert!(provider.current_url().await.contains("primary"));

        provider.record_failure("https://primary.example.com").await;
        assert!(provider.current_url().await.contains("fallback"));

        // failures on a non-current endpoint don't move the cursor
        provider.record_failure("https://primary.example.com").await;
        assert!(provider.current_url().await.contains("fallback"));

        // a single failure is enough to move on, but never onto an unhealthy endpoint
        provider.record_failure("https://fallback.example.com").await;
        assert!(provider.current_url().await.contains("fallback"));
        let stats = provider.stats().await;
        assert!(stats.iter().all(|e| e.health == EndpointHealth::Unhealthy));
    }

    #[test]
    fn test_http_client_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.user_agent.starts_with("tokend/"));
        assert!(config.gzip);
    }

    #[test]
    fn test_chain_api_creation() {
        let api = ChainApi::with_config(presets::jungle4()).unwrap();
        assert_eq!(api.request_count(), 0);
        assert!(ChainApi::new("nope").is_err());
    }

    #[test]
    fn test_presets() {
        for config in [
            presets::eos_mainnet(),
            presets::jungle4(),
            presets::wax_mainnet(),
            presets::telos_mainnet(),
        ] {
            assert!(config.validate().is_ok());
            assert!(!config.fallback_urls.is_empty());
        }
        assert!(presets::jungle4().url.contains("jungle4"));
    }

    #[tokio::test]
    async fn test_get_info() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_INFO))
            .respond_with(ResponseTemplate::new(200).set_body_json(info_body()))
            .expect(1)
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        let info = api.get_info().await.unwrap();
        assert_eq!(info.head_block_num, 1000);
        assert_eq!(info.head_block_producer, Some(Name::new("eosio").unwrap()));
        assert_eq!(api.request_count(), 1);

        let stats = api.stats().await;
        assert_eq!(stats[0].total_requests, 1);
        assert_eq!(stats[0].health, EndpointHealth::Healthy);
    }

    #[tokio::test]
    async fn test_get_table_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_TABLE_ROWS))
            .and(body_partial_json(serde_json::json!({
                "code": "eosio.token",
                "scope": "teamgreymass",
                "table": "accounts",
                "json": true,
                "limit": 1,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "rows": [{"balance": "1.0000 EOS"}],
                "more": false,
                "next_key": ""
            })))
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        let params = GetTableRowsParams::new(
            Name::new("eosio.token").unwrap(),
            "teamgreymass",
            Name::new("accounts").unwrap(),
        )
        .limit(1);
        let rows: TableRows = api.get_table_rows(&params).await.unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0]["balance"], "1.0000 EOS");
    }

    #[tokio::test]
    async fn test_api_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "code": 500,
                "message": "Internal Service Error",
                "error": {
                    "code": 3060003,
                    "name": "contract_table_query_exception",
                    "what": "Contract Table Query Exception",
                    "details": [{"message": "Table bogus is not specified in the ABI"}]
                }
            })))
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        let err = api.get_info().await.unwrap_err();
        match err {
            TokenError::ApiError { code, name, message } => {
                assert_eq!(code, 3060003);
                assert_eq!(name, "contract_table_query_exception");
                assert!(message.contains("bogus"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        let err = api.get_info().await.unwrap_err();
        assert!(matches!(
            err,
            TokenError::RpcRequestError { status: 404, ref endpoint, .. } if endpoint == GET_INFO
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        let err = api.get_info().await.unwrap_err();
        assert!(matches!(err, TokenError::RateLimited { retry_after_secs: 7 }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let api = ChainApi::with_config(unlimited(&server.uri())).unwrap();
        assert!(matches!(
            api.get_info().await,
            Err(TokenError::JsonError(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let api = ChainApi::with_config(unlimited("http://127.0.0.1:1")).unwrap();
        let err = api.get_info().await.unwrap_err();
        assert!(matches!(err, TokenError::RpcConnectionError { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_failover_to_fallback() {
        let primary = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&primary)
            .await;

        let fallback = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_INFO))
            .respond_with(ResponseTemplate::new(200).set_body_json(info_body()))
            .expect(2)
            .mount(&fallback)
            .await;

        let config = unlimited(&primary.uri()).with_fallback(fallback.uri());
        let api = ChainApi::with_config(config).unwrap();

        assert!(api.get_info().await.is_ok());
        assert_eq!(api.current_url().await, fallback.uri());
        assert_eq!(api.request_count(), 2);

        // sticks to the fallback afterwards
        assert!(api.get_info().await.is_ok());
        let stats = api.stats().await;
        assert_eq!(stats[0].health, EndpointHealth::Unhealthy);
        assert_eq!(stats[1].total_requests, 2);
    }
}
