use axum::http::HeaderValue;
use clap::ArgMatches;
use repotree_scanner::{ClientOptions, RetryConfig};
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API base URL {0}: {1}")]
    InvalidApiBase(String, String),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Retry attempts must be at least 1")]
    NoAttempts,

    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Process-wide settings, built once at startup and passed down explicitly.
#[derive(Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub api_base: String,
    pub token: Option<String>,
    pub workers: usize,
    pub retries: u32,
    pub timeout: Option<Duration>,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            api_base: repotree_scanner::client::DEFAULT_API_BASE.to_string(),
            token: None,
            workers: repotree_scanner::crawler::DEFAULT_WORKERS,
            retries: 1,
            timeout: None,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind", &self.bind)
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("workers", &self.workers)
            .field("retries", &self.retries)
            .field("timeout", &self.timeout)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            bind: matches
                .get_one::<SocketAddr>("bind")
                .copied()
                .unwrap_or(defaults.bind),
            api_base: matches
                .get_one::<String>("api-base")
                .cloned()
                .unwrap_or(defaults.api_base),
            token: matches
                .get_one::<String>("token")
                .filter(|t| !t.is_empty())
                .cloned(),
            workers: matches
                .get_one::<usize>("workers")
                .copied()
                .unwrap_or(defaults.workers),
            retries: matches
                .get_one::<u32>("retries")
                .copied()
                .unwrap_or(defaults.retries),
            timeout: matches
                .get_one::<u64>("timeout")
                .map(|secs| Duration::from_secs(*secs)),
            cors_origins: matches
                .get_many::<String>("cors-origin")
                .map(|values| values.filter(|v| !v.is_empty()).cloned().collect())
                .unwrap_or(defaults.cors_origins),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.api_base)
            .map_err(|e| ConfigError::InvalidApiBase(self.api_base.clone(), e.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidApiBase(
                self.api_base.clone(),
                "missing host".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.retries == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroTimeout);
        }
        self.origin_headers()?;
        Ok(())
    }

    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
            })
            .collect()
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::default()
            .with_base_url(self.api_base.trim_end_matches('/'))
            .with_token(self.token.clone())
            .with_timeout(self.timeout)
            .with_retry(RetryConfig::default().with_max_attempts(self.retries))
    }
}
