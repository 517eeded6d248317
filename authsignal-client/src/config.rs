//! Client configuration.

use crate::{ClientError, Result, RetryConfig};
use secrecy::SecretString;
use std::env;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://signal.authsignal.com/v1/";

/// Environment variable holding the secret key.
pub const ENV_API_SECRET_KEY: &str = "AUTHSIGNAL_API_SECRET_KEY";
/// Environment variable overriding the base URL.
pub const ENV_API_URL: &str = "AUTHSIGNAL_API_URL";
/// Environment variable enabling retries (`true` / `1`).
pub const ENV_RETRY: &str = "AUTHSIGNAL_RETRY";
/// Environment variable enabling debug logging (`true` / `1`).
pub const ENV_DEBUG: &str = "AUTHSIGNAL_DEBUG";

/// Authsignal client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Tenant secret key, also used to verify webhooks.
    pub api_secret_key: SecretString,
    /// Base URL for all requests.
    pub api_url: String,
    /// Retry configuration, `None` disables retries.
    pub retry: Option<RetryConfig>,
    /// Log request and response bodies at debug level.
    pub debug: bool,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default settings.
    pub fn new(api_secret_key: impl Into<String>) -> Self {
        Self {
            api_secret_key: SecretString::new(api_secret_key.into()),
            api_url: DEFAULT_API_URL.to_string(),
            retry: None,
            debug: false,
            timeout: Duration::from_secs(30),
            user_agent: format!("authsignal-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from `AUTHSIGNAL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let secret = env::var(ENV_API_SECRET_KEY)
            .map_err(|_| ClientError::Config(format!("{} is not set", ENV_API_SECRET_KEY)))?;

        let mut builder = Self::builder().api_secret_key(secret);

        if let Ok(url) = env::var(ENV_API_URL) {
            builder = builder.api_url(url);
        }
        if env_flag(ENV_RETRY) {
            builder = builder.retry(RetryConfig::default());
        }
        builder = builder.debug(env_flag(ENV_DEBUG));

        builder.build()
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Builder for client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_secret_key: Option<String>,
    api_url: Option<String>,
    retry: Option<RetryConfig>,
    debug: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the tenant secret key.
    pub fn api_secret_key(mut self, key: impl Into<String>) -> Self {
        self.api_secret_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Enable retries with the given configuration.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    /// Enable or disable body logging.
    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = enable;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ClientConfig> {
        let secret = self
            .api_secret_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClientError::Config("No Authsignal API Secret Key Set".to_string()))?;

        let mut config = ClientConfig::new(secret);
        if let Some(url) = self.api_url {
            config.api_url = url;
        }
        config.retry = self.retry;
        config.debug = self.debug;
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("secret");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.retry.is_none());
        assert!(!config.debug);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_secret_key.expose_secret(), "secret");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .api_secret_key("secret")
            .api_url("http://localhost:8080")
            .retry(RetryConfig::immediate(2))
            .debug(true)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.retry.unwrap().max_attempts, 2);
        assert!(config.debug);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_requires_secret() {
        let result = ClientConfig::builder().build();
        assert!(matches!(result, Err(ClientError::Config(_))));

        let result = ClientConfig::builder().api_secret_key("").build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let config = ClientConfig::new("do-not-print");
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
