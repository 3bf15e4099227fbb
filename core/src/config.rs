//! Client configuration.
//!
//! Everything the client needs is passed in through `ClientConfig`; nothing
//! is read from process-wide state after construction. `from_env` is a
//! convenience for binaries and integration environments.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::Auth;

/// Default location of the API entry point below the base URL.
pub const DEFAULT_API_PATH: &str = "/includes/api.php";

/// Default environment variable prefix used by `ClientConfig::from_env`.
pub const DEFAULT_ENV_PREFIX: &str = "WHM";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(String),

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },

    #[error("invalid base url `{0}`: expected an http:// or https:// url")]
    InvalidBaseUrl(String),

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("api path `{0}` must start with `/`")]
    InvalidApiPath(String),
}

/// Connection settings for a `Client`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the billing installation, e.g. `https://billing.example.com/`.
    pub base_url: String,

    pub auth: Auth,

    /// Payment method used by `AddOrder` when the request names none.
    #[serde(default)]
    pub payment_method: Option<String>,

    /// Global request timeout in milliseconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default = "default_api_path")]
    pub api_path: String,
}

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth: Auth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            payment_method: None,
            timeout_ms: None,
            api_path: default_api_path(),
        }
    }

    /// Sets the global request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the default payment method for new orders.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    #[must_use]
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    /// Load from `WHM_URL`, `WHM_IDENT`, `WHM_SECRET`, `WHM_ACCESS`,
    /// `WHM_PAYMENTMETHOD` and `WHM_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, the timeout does
    /// not parse, or the result fails `validate`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(DEFAULT_ENV_PREFIX)
    }

    /// Same as `from_env` with a custom variable prefix.
    ///
    /// # Errors
    ///
    /// See `from_env`.
    pub fn from_env_with(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |name| env::var(name).ok())
    }

    fn from_lookup(
        prefix: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let name = |suffix: &str| format!("{prefix}_{suffix}");
        let required = |suffix: &str| {
            let var = name(suffix);
            lookup(&var).ok_or(ConfigError::MissingVar(var))
        };

        let auth = Auth::new(required("IDENT")?, required("SECRET")?, required("ACCESS")?);
        let mut config = ClientConfig::new(required("URL")?, auth);

        config.payment_method = lookup(&name("PAYMENTMETHOD")).filter(|s| !s.is_empty());

        let timeout_var = name("TIMEOUT_MS");
        if let Some(raw) = lookup(&timeout_var) {
            let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                name: timeout_var.clone(),
                reason: e.to_string(),
            })?;
            config.timeout_ms = Some(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL, timeout or api path is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.trim_matches('/').is_empty());
        if !has_scheme || !has_host {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidTimeout);
        }

        if !self.api_path.starts_with('/') {
            return Err(ConfigError::InvalidApiPath(self.api_path.clone()));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Full URL every call is posted to.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url.trim().trim_end_matches('/'), self.api_path)
    }
}
