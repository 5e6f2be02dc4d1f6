//! Gateway interceptors
//!
//! Interceptors observe and tweak each request after the gateway has
//! applied base address, token and headers, observe raw responses before
//! envelope handling, and are told about every failure. The hooks are
//! best-effort and should avoid expensive work.

use crate::error::GatewayError;
use crate::transport::{TransportRequest, TransportResponse};
use reqwest::Method;

/// Context passed to interceptors describing the request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Per-client monotonically increasing id.
    pub request_id: u64,
    pub method: Method,
    /// Fully resolved URL, or the raw path when resolution failed.
    pub url: String,
}

/// Gateway interceptor trait
pub trait GatewayInterceptor: Send + Sync {
    /// Called before sending a request. Return the (possibly modified)
    /// request, or an error to short-circuit it.
    fn on_before_send(
        &self,
        _ctx: &RequestContext,
        request: TransportRequest,
    ) -> Result<TransportRequest, GatewayError> {
        Ok(request)
    }

    /// Called for every received response, before the envelope strategy
    /// runs. Returning an error fails the request with that error.
    fn on_response(
        &self,
        _ctx: &RequestContext,
        _response: &TransportResponse,
    ) -> Result<(), GatewayError> {
        Ok(())
    }

    /// Called when the request fails for any reason.
    fn on_error(&self, _ctx: &RequestContext, _error: &GatewayError) {}
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Default)]
pub struct LoggingInterceptor;

impl GatewayInterceptor for LoggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &RequestContext,
        request: TransportRequest,
    ) -> Result<TransportRequest, GatewayError> {
        tracing::debug!(target: "console_core::http", id=ctx.request_id, method=%ctx.method, url=%ctx.url, has_body=request.body.is_some(), "sending request");
        Ok(request)
    }

    fn on_response(
        &self,
        ctx: &RequestContext,
        response: &TransportResponse,
    ) -> Result<(), GatewayError> {
        tracing::debug!(target: "console_core::http", id=ctx.request_id, url=%ctx.url, status=response.status, bytes=response.body.len(), "response received");
        Ok(())
    }

    fn on_error(&self, ctx: &RequestContext, error: &GatewayError) {
        tracing::debug!(target: "console_core::http", id=ctx.request_id, url=%ctx.url, kind=?error.kind(), code=?error.code(), err=%error, "request error");
    }
}
