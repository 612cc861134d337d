//! Configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokend_error::{Result, TokenError};
use tokend_provider::{presets, ProviderConfig, RateLimitConfig};
use tokend_types::{Name, Symbol};

/// Default configuration file read by [`TokenConfig::load`]
pub const CONFIG_FILE: &str = "tokend_config.json";

/// Settings for a [`Token`](crate::Token) built with
/// [`Token::from_config`](crate::Token::from_config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Primary chain API URL
    pub api_url: String,
    /// Fallback chain API URLs
    pub fallback_urls: Vec<String>,
    /// Token contract account
    pub contract: String,
    /// Symbol for bare amounts, e.g. `4,EOS`
    pub symbol: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Client-side request rate limit, `None` for unlimited
    pub requests_per_second: Option<u32>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::jungle4()
    }
}

impl TokenConfig {
    fn from_provider(provider: ProviderConfig) -> Self {
        Self {
            api_url: provider.url,
            fallback_urls: provider.fallback_urls,
            contract: "eosio.token".to_string(),
            symbol: "4,EOS".to_string(),
            timeout_secs: provider.timeout_secs,
            requests_per_second: provider.rate_limit.map(|r| r.requests_per_second),
        }
    }

    /// EOS mainnet
    pub fn eos_mainnet() -> Self {
        Self::from_provider(presets::eos_mainnet())
    }

    /// Jungle 4 testnet
    pub fn jungle4() -> Self {
        Self::from_provider(presets::jungle4())
    }

    /// Reads a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| TokenError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    /// Writes the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TokenError::ConfigError(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads [`CONFIG_FILE`] from the working directory, falling back to the
    /// defaults when it is missing or unreadable
    pub fn load() -> Self {
        match Self::from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Defaults overridden by `TOKEND_*` environment variables, after
    /// loading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("TOKEND_API_URL") {
            self.api_url = url;
            self.fallback_urls.clear();
        }
        if let Some(contract) = var("TOKEND_CONTRACT") {
            self.contract = contract;
        }
        if let Some(symbol) = var("TOKEND_SYMBOL") {
            self.symbol = symbol;
        }
        if let Some(timeout) = var("TOKEND_TIMEOUT_SECS") {
            self.timeout_secs = timeout.trim().parse::<u64>().map_err(|e| {
                TokenError::ConfigError(format!("TOKEND_TIMEOUT_SECS '{}': {}", timeout, e))
            })?;
        }
        Ok(self)
    }

    /// Checks URLs, the contract name and the symbol
    pub fn validate(&self) -> Result<()> {
        self.provider_config().validate()?;
        Name::new(&self.contract).map_err(|e| TokenError::ConfigError(e.to_string()))?;
        self.symbol()?;
        Ok(())
    }

    /// The default symbol, parsed
    pub fn symbol(&self) -> Result<Symbol> {
        self.symbol
            .parse()
            .map_err(|e: TokenError| TokenError::ConfigError(e.to_string()))
    }

    /// Chain API settings derived from this configuration
    pub fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new(self.api_url.clone()).with_timeout(self.timeout_secs);
        for url in &self.fallback_urls {
            config = config.with_fallback(url.clone());
        }
        match self.requests_per_second {
            Some(rps) => config.with_rate_limit(RateLimitConfig {
                requests_per_second: rps,
                burst_size: rps.saturating_mul(2),
            }),
            None => config.without_rate_limit(),
        }
    }
}
