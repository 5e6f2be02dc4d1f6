//! Type Conversions for GatewayError
//!
//! From implementations for the error types the gateway runs into.

use super::types::GatewayError;

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::ConfigurationError(err.to_string())
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
