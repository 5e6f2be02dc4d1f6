//! Default values
//!
//! Compile-time defaults used when a `GatewayConfig` leaves a field unset.

/// HTTP defaults.
pub mod http {
    use std::time::Duration;

    /// Base address used until `set_base_address` is called.
    pub const BASE_ADDRESS: &str = "http://localhost:8080";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const USER_AGENT: &str = concat!("console-core/", env!("CARGO_PKG_VERSION"));
    pub const AUTH_HEADER: &str = "Authorization";
}

/// Auth token storage.
pub mod auth {
    /// Key the login flow writes the token under.
    pub const TOKEN_KEY: &str = "token";
}

/// Notification durations.
pub mod notify {
    use std::time::Duration;

    pub const WARNING_DURATION: Duration = Duration::from_secs(3);
    pub const ERROR_DURATION: Duration = Duration::from_secs(3);
}

/// Health probe.
pub mod health {
    use std::time::Duration;

    /// Shortest accepted polling interval.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);
}

/// User-facing fallback texts.
pub mod messages {
    pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
    pub const REQUEST_FAILED: &str = "Request failed, please check your connection or log in again";
    pub const SERVER_ERROR: &str = "The server could not complete the request";
    pub const MALFORMED_RESPONSE: &str = "The server returned an unreadable response";
    pub const BASE_ADDRESS_UPDATED: &str = "Base address updated";
    pub const BASE_ADDRESS_EMPTY: &str = "Base address must not be empty";
}
