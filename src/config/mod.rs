//! Gateway configuration
//!
//! `GatewayConfig` holds everything the client needs at construction time.
//! The base address stored here is only the *initial* address; once a client
//! is built the live address is owned by the client and changed through
//! `GatewayClient::set_base_address`.

use crate::defaults;
use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// How the auth token is written into the authorization header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// The token is sent verbatim.
    #[default]
    Raw,
    /// The token is sent as `Bearer <token>`.
    Bearer,
}

impl AuthScheme {
    pub fn header_value(self, token: &str) -> String {
        match self {
            Self::Raw => token.to_string(),
            Self::Bearer => format!("Bearer {token}"),
        }
    }
}

/// Gateway client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Initial base address
    pub base_address: String,
    /// Request timeout
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// User agent
    pub user_agent: Option<String>,
    /// Headers added to every request
    pub headers: HashMap<String, String>,
    /// Keep a cookie store so cookie-based sessions travel with each request.
    pub with_credentials: bool,
    /// Storage key the auth token lives under
    pub token_key: String,
    /// Header carrying the auth token
    pub auth_header: String,
    pub auth_scheme: AuthScheme,
    #[serde(with = "duration_serde")]
    pub warning_duration: Duration,
    #[serde(with = "duration_serde")]
    pub error_duration: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_address: defaults::http::BASE_ADDRESS.to_string(),
            timeout: Some(defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(defaults::http::CONNECT_TIMEOUT),
            user_agent: Some(defaults::http::USER_AGENT.to_string()),
            headers: HashMap::new(),
            with_credentials: false,
            token_key: defaults::auth::TOKEN_KEY.to_string(),
            auth_header: defaults::http::AUTH_HEADER.to_string(),
            auth_scheme: AuthScheme::Raw,
            warning_duration: defaults::notify::WARNING_DURATION,
            error_duration: defaults::notify::ERROR_DURATION,
        }
    }
}

impl GatewayConfig {
    /// Returns a builder for constructing `GatewayConfig`
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::new()
    }

    /// Load overrides from the environment on top of the defaults.
    ///
    /// Supported variables:
    /// - `CONSOLE_BASE_URL`
    /// - `CONSOLE_WITH_CREDENTIALS` (`true`/`1`/`on`/`yes`)
    /// - `CONSOLE_TIMEOUT_SECS`
    /// - `CONSOLE_TOKEN_KEY`
    pub fn from_env() -> Result<Self, GatewayError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("CONSOLE_BASE_URL") {
            builder = builder.base_address(url);
        }
        if let Ok(val) = std::env::var("CONSOLE_WITH_CREDENTIALS") {
            builder = builder.with_credentials(parse_flag(&val));
        }
        if let Ok(secs) = std::env::var("CONSOLE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| {
                GatewayError::ConfigurationError(format!(
                    "Invalid CONSOLE_TIMEOUT_SECS '{secs}': {e}"
                ))
            })?;
            builder = builder.timeout(Some(Duration::from_secs(secs)));
        }
        if let Ok(key) = std::env::var("CONSOLE_TOKEN_KEY") {
            builder = builder.token_key(key);
        }
        Ok(builder.build())
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Builder for `GatewayConfig`
#[derive(Debug, Clone, Default)]
pub struct GatewayConfigBuilder {
    base_address: Option<String>,
    timeout: Option<Option<Duration>>,
    connect_timeout: Option<Option<Duration>>,
    user_agent: Option<Option<String>>,
    headers: HashMap<String, String>,
    with_credentials: Option<bool>,
    token_key: Option<String>,
    auth_header: Option<String>,
    auth_scheme: Option<AuthScheme>,
    warning_duration: Option<Duration>,
    error_duration: Option<Duration>,
}

impl GatewayConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_address<S: Into<String>>(mut self, base_address: S) -> Self {
        self.base_address = Some(base_address.into());
        self
    }
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = Some(timeout);
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = Some(user_agent.map(Into::into));
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
    pub fn with_credentials(mut self, val: bool) -> Self {
        self.with_credentials = Some(val);
        self
    }
    pub fn token_key<S: Into<String>>(mut self, key: S) -> Self {
        self.token_key = Some(key.into());
        self
    }
    pub fn auth_header<S: Into<String>>(mut self, name: S) -> Self {
        self.auth_header = Some(name.into());
        self
    }
    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = Some(scheme);
        self
    }
    pub fn warning_duration(mut self, duration: Duration) -> Self {
        self.warning_duration = Some(duration);
        self
    }
    pub fn error_duration(mut self, duration: Duration) -> Self {
        self.error_duration = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> GatewayConfig {
        let d = GatewayConfig::default();
        GatewayConfig {
            base_address: self.base_address.unwrap_or(d.base_address),
            timeout: self.timeout.unwrap_or(d.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(d.connect_timeout),
            user_agent: self.user_agent.unwrap_or(d.user_agent),
            headers: self.headers,
            with_credentials: self.with_credentials.unwrap_or(d.with_credentials),
            token_key: self.token_key.unwrap_or(d.token_key),
            auth_header: self.auth_header.unwrap_or(d.auth_header),
            auth_scheme: self.auth_scheme.unwrap_or(d.auth_scheme),
            warning_duration: self.warning_duration.unwrap_or(d.warning_duration),
            error_duration: self.error_duration.unwrap_or(d.error_duration),
        }
    }
}

// Durations are serialized as whole seconds.
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
