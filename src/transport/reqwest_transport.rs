use super::{HttpTransport, TransportRequest, TransportResponse};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use async_trait::async_trait;

/// `reqwest`-backed transport.
///
/// Credentials mode maps onto reqwest's cookie store: with
/// `with_credentials` enabled, cookies set by the backend (the session
/// cookie) are kept and replayed on later requests.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport from the gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().cookie_store(config.with_credentials);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder.build().map_err(|e| {
            GatewayError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Wrap an existing client. Its own settings (timeouts, cookie store)
    /// are used as-is.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, GatewayError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
