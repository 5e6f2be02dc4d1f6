//! Gateway client
//!
//! The single point of outbound HTTP traffic for a console. Every request
//! goes through the same pipeline:
//!
//! 1. resolve the *current* base address and join the path onto it;
//! 2. ask the token provider for a token and set the authorization header;
//! 3. apply default and per-request headers, query and JSON body;
//! 4. run interceptors, send through the transport;
//! 5. classify the response with the envelope strategy.
//!
//! Callers only ever see the unwrapped `data` payload or a
//! [`GatewayError`]. Each failure is also reported exactly once through the
//! [`Notifier`], so screens may add their own handling without having to
//! surface the error themselves.

mod address;
mod builder;
mod headers;
mod options;

pub use address::{BaseAddress, parse_base_address};
pub use builder::GatewayClientBuilder;
pub use headers::HeaderBuilder;
pub use options::RequestOptions;
pub use reqwest::Method;

use crate::auth::TokenProvider;
use crate::config::GatewayConfig;
use crate::defaults::messages;
use crate::envelope::{EnvelopeOutcome, EnvelopeStrategy};
use crate::error::GatewayError;
use crate::interceptor::{GatewayInterceptor, RequestContext};
use crate::notify::Notifier;
use crate::transport::{HttpTransport, TransportRequest, TransportResponse};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared gateway client. Cloning is cheap; clones share the base address,
/// transport and collaborators.
#[derive(Clone)]
pub struct GatewayClient {
    config: Arc<GatewayConfig>,
    base_address: BaseAddress,
    envelope: Arc<dyn EnvelopeStrategy>,
    tokens: Arc<dyn TokenProvider>,
    notifier: Arc<dyn Notifier>,
    transport: Arc<dyn HttpTransport>,
    interceptors: Arc<[Arc<dyn GatewayInterceptor>]>,
    next_request_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_address", &self.base_address.current().as_str())
            .field("envelope", &self.envelope.name())
            .field("with_credentials", &self.config.with_credentials)
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::new()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The address requests are currently sent to.
    pub fn base_address(&self) -> Url {
        self.base_address.current()
    }

    /// Replace the base address for all subsequent requests.
    ///
    /// A malformed candidate leaves the current address untouched, shows an
    /// error notification and returns `GatewayError::Validation`; requests
    /// already in flight are unaffected either way.
    pub fn set_base_address(&self, candidate: &str) -> Result<(), GatewayError> {
        match parse_base_address(candidate) {
            Ok(url) => {
                let previous = self.base_address.replace(url.clone());
                tracing::info!(target: "console_core::http", from=%previous, to=%url, "base address updated");
                self.notifier.success(messages::BASE_ADDRESS_UPDATED);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "console_core::http", candidate=%candidate, err=%err, "rejected base address");
                self.notifier.error(err.message(), self.config.error_duration);
                Err(err)
            }
        }
    }

    /// A client sharing everything with this one except the notifier.
    /// Background jobs use this to stay quiet.
    pub fn with_notifier(&self, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            ..self.clone()
        }
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.request(Method::PATCH, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        self.request(Method::DELETE, path, options).await
    }

    /// Issue one request and return the unwrapped payload.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, GatewayError> {
        let mut ctx = self.context(&method, path);
        let result = self.execute(&mut ctx, method, path, options).await;
        result.map_err(|err| self.report(&ctx, err))
    }

    /// Like [`request`](Self::request), decoding the payload into `T`.
    /// A payload of the wrong shape fails with `GatewayError::JsonError`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, GatewayError> {
        let mut ctx = self.context(&method, path);
        let result = match self.execute(&mut ctx, method, path, options).await {
            Ok(data) => serde_json::from_value(data).map_err(|e| {
                GatewayError::JsonError(format!("Unexpected payload shape: {e}"))
            }),
            Err(err) => Err(err),
        };
        result.map_err(|err| self.report(&ctx, err))
    }

    fn context(&self, method: &Method, path: &str) -> RequestContext {
        RequestContext {
            request_id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            method: method.clone(),
            url: path.to_string(),
        }
    }

    async fn execute(
        &self,
        ctx: &mut RequestContext,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, GatewayError> {
        let mut url = self.base_address.resolve(path)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }
        ctx.url = url.to_string();

        let headers = self.build_headers(&options)?;
        let mut request = TransportRequest {
            method,
            url,
            headers,
            body: options.body,
        };
        for interceptor in self.interceptors.iter() {
            request = interceptor.on_before_send(ctx, request)?;
        }

        let response = self.transport.send(request).await?;
        for interceptor in self.interceptors.iter() {
            interceptor.on_response(ctx, &response)?;
        }
        self.unwrap_envelope(response)
    }

    fn build_headers(
        &self,
        options: &RequestOptions,
    ) -> Result<reqwest::header::HeaderMap, GatewayError> {
        let mut builder = HeaderBuilder::new().with_custom_headers(&self.config.headers)?;
        // Read on every request: login/logout elsewhere must apply immediately.
        if let Some(token) = self.tokens.token().filter(|t| !t.is_empty()) {
            builder = builder.with_auth(
                &self.config.auth_header,
                &self.config.auth_scheme.header_value(&token),
            )?;
        }
        Ok(builder.with_custom_headers(&options.headers)?.build())
    }

    fn unwrap_envelope(&self, response: TransportResponse) -> Result<Value, GatewayError> {
        let status = response.status;
        let status_code = Some(i64::from(status));
        let body: Option<Value> = serde_json::from_slice(&response.body).ok();

        if !response.is_success() {
            if self.envelope.is_session_expired_status(status) {
                return Err(GatewayError::session_expired(
                    messages::SESSION_EXPIRED,
                    status_code,
                ));
            }
            return Err(match body.map(|b| self.envelope.classify(b)) {
                Some(EnvelopeOutcome::SessionExpired { message, code }) => {
                    GatewayError::session_expired(
                        message.unwrap_or_else(|| messages::SESSION_EXPIRED.to_string()),
                        code.or(status_code),
                    )
                }
                Some(EnvelopeOutcome::Failure {
                    message: Some(message),
                    code,
                }) => GatewayError::application(message, code.or(status_code)),
                _ => GatewayError::application(
                    format!("Request failed with status {status}"),
                    status_code,
                ),
            });
        }

        let Some(body) = body else {
            return Err(GatewayError::application(
                messages::MALFORMED_RESPONSE,
                status_code,
            ));
        };
        match self.envelope.classify(body) {
            EnvelopeOutcome::Success(data) => Ok(data),
            EnvelopeOutcome::SessionExpired { message, code } => Err(
                GatewayError::session_expired(
                    message.unwrap_or_else(|| messages::SESSION_EXPIRED.to_string()),
                    code,
                ),
            ),
            EnvelopeOutcome::Failure { message, code } => Err(GatewayError::application(
                message.unwrap_or_else(|| messages::SERVER_ERROR.to_string()),
                code,
            )),
        }
    }

    /// Notify interceptors and the user about a failed request. Exactly one
    /// notification per failure.
    fn report(&self, ctx: &RequestContext, err: GatewayError) -> GatewayError {
        for interceptor in self.interceptors.iter() {
            interceptor.on_error(ctx, &err);
        }
        let config = &self.config;
        match &err {
            GatewayError::SessionExpired { .. } => {
                self.notifier
                    .warning(messages::SESSION_EXPIRED, config.warning_duration);
            }
            GatewayError::Transport { .. } => {
                self.notifier
                    .error(messages::REQUEST_FAILED, config.error_duration);
            }
            other => self.notifier.error(other.message(), config.error_duration),
        }
        tracing::debug!(target: "console_core::http", id=ctx.request_id, url=%ctx.url, kind=?err.kind(), "request failed");
        err
    }
}
