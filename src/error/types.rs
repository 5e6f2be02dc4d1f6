//! Core error types.

use thiserror::Error;

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client-side input was rejected before anything was sent.
    Validation,
    /// The backend reported that the caller's session is no longer valid.
    SessionExpired,
    /// The backend rejected the request with a business-rule failure.
    Application,
    /// No response was received (network, timeout, unreachable host).
    Transport,
    Configuration,
    Parsing,
    Storage,
}

/// Errors produced by the gateway client and its collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Session expired: {message}")]
    SessionExpired { message: String, code: Option<i64> },

    #[error("Application error: {message}")]
    Application { message: String, code: Option<i64> },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn session_expired(message: impl Into<String>, code: Option<i64>) -> Self {
        Self::SessionExpired {
            message: message.into(),
            code,
        }
    }

    pub fn application(message: impl Into<String>, code: Option<i64>) -> Self {
        Self::Application {
            message: message.into(),
            code,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get the error kind.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::SessionExpired { .. } => ErrorKind::SessionExpired,
            Self::Application { .. } => ErrorKind::Application,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ConfigurationError(_) => ErrorKind::Configuration,
            Self::JsonError(_) => ErrorKind::Parsing,
            Self::StorageError(_) => ErrorKind::Storage,
        }
    }

    /// Original code reported by the backend: the envelope code when the
    /// envelope carried one, otherwise the HTTP status.
    pub const fn code(&self) -> Option<i64> {
        match self {
            Self::SessionExpired { code, .. } | Self::Application { code, .. } => *code,
            _ => None,
        }
    }

    /// Message without the kind prefix, suitable for a toast.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::SessionExpired { message, .. }
            | Self::Application { message, .. }
            | Self::Transport { message } => message,
            Self::ConfigurationError(message)
            | Self::JsonError(message)
            | Self::StorageError(message) => message,
        }
    }

    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}
