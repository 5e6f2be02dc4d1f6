//! HTTP transport abstraction
//!
//! The gateway client never talks to `reqwest` directly; it hands a fully
//! assembled [`TransportRequest`] to an [`HttpTransport`]. The default
//! [`ReqwestTransport`] is what production uses; tests and embedders can
//! inject their own transport to observe the final URL/headers/body or to
//! return synthetic responses.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

use crate::error::GatewayError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};

/// Transport-level request data.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// JSON body, sent with `Content-Type: application/json` when present.
    pub body: Option<serde_json::Value>,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations return `Ok` for every received response, whatever its
/// status, and `Err(GatewayError::Transport)` only when no response arrived.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, GatewayError>;
}
