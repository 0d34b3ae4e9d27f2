//! Client configuration
//!
//! Builder-style configuration for the API client: base URL, timeouts,
//! concurrency and fan-out bounds, cache TTL, and optional client-side
//! request pacing. Credentials are kept separate so configs can be
//! logged or reused without leaking secrets.

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use std::time::Duration;

/// Default Fivetran REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.fivetran.com/v1/";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "FIVETRAN_API_KEY";

/// Environment variable holding the API secret
pub const API_SECRET_ENV: &str = "FIVETRAN_API_SECRET";

// ============================================================================
// Credentials
// ============================================================================

/// API key/secret pair used for basic auth
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    /// Create credentials from explicit values
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Read credentials from the environment
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| Error::MissingCredential {
            name: "API key".to_string(),
            env: API_KEY_ENV.to_string(),
        })?;
        let api_secret = std::env::var(API_SECRET_ENV).map_err(|_| Error::MissingCredential {
            name: "API secret".to_string(),
            env: API_SECRET_ENV.to_string(),
        })?;
        Ok(Self::new(api_key, api_secret))
    }
}

// Never print the secret.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

// ============================================================================
// Client configuration
// ============================================================================

/// Configuration for [`crate::client::ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum concurrent in-flight requests (0 = unbounded)
    pub max_concurrent_requests: u16,
    /// How long a cached response stays valid
    pub cache_ttl: Duration,
    /// Backoff applied on 429 when the server sends no Retry-After header
    pub default_retry_after: Duration,
    /// Maximum parallel downstream fetches in fan-out operations
    pub fan_out_width: usize,
    /// Optional client-side request pacing (token bucket)
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(40),
            max_concurrent_requests: 0,
            cache_ttl: Duration::from_secs(60 * 60),
            default_retry_after: Duration::from_secs(60),
            fan_out_width: 5,
            rate_limit: None,
            user_agent: format!("fivetran-lineage/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Bound the number of concurrent in-flight requests (0 = unbounded)
    pub fn max_concurrent_requests(mut self, max: u16) -> Self {
        self.config.max_concurrent_requests = max;
        self
    }

    /// Set the response cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the fallback backoff used when a 429 carries no Retry-After
    pub fn default_retry_after(mut self, delay: Duration) -> Self {
        self.config.default_retry_after = delay;
        self
    }

    /// Set the fan-out width for downstream fetches
    pub fn fan_out_width(mut self, width: usize) -> Self {
        self.config.fan_out_width = width;
        self
    }

    /// Enable client-side request pacing
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(40));
        assert_eq!(config.max_concurrent_requests, 0);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.default_retry_after, Duration::from_secs(60));
        assert_eq!(config.fan_out_width, 5);
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://api.example.com/v1/")
            .timeout(Duration::from_secs(10))
            .max_concurrent_requests(4)
            .cache_ttl(Duration::from_secs(30))
            .default_retry_after(Duration::from_secs(5))
            .fan_out_width(8)
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.base_url, "https://api.example.com/v1/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_requests, 4);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.default_retry_after, Duration::from_secs(5));
        assert_eq!(config.fan_out_width, 8);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("key", "very-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("very-secret"));
    }
}
