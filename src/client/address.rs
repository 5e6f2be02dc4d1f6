//! Base address handling.
//!
//! The live base address is shared by a client and every clone derived from
//! it, and is read fresh for each request.

use crate::defaults::messages;
use crate::error::GatewayError;
use reqwest::Url;
use std::sync::{Arc, RwLock};

/// Shared, mutable base address.
#[derive(Debug, Clone)]
pub struct BaseAddress {
    inner: Arc<RwLock<Url>>,
}

impl BaseAddress {
    pub fn new(url: Url) -> Self {
        Self {
            inner: Arc::new(RwLock::new(url)),
        }
    }

    /// Current address.
    pub fn current(&self) -> Url {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn replace(&self, url: Url) -> Url {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, url)
    }

    /// Join a request path onto the current address.
    ///
    /// Paths are appended to the address's own path, so a base of
    /// `https://host/api` and a path of `/users` yield `https://host/api/users`.
    /// Absolute `http(s)` URLs bypass the base address.
    pub fn resolve(&self, path: &str) -> Result<Url, GatewayError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return parse_http_url(path);
        }
        let base = self.current();
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Ok(base);
        }
        let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| {
            GatewayError::validation(format!("Invalid request path '{path}': {e}"))
        })
    }
}

/// Validate a candidate base address: non-empty, absolute, `http`/`https`,
/// with a host and without query or fragment.
pub fn parse_base_address(candidate: &str) -> Result<Url, GatewayError> {
    let url = parse_http_url(candidate)?;
    if url.query().is_some() || url.fragment().is_some() {
        return Err(GatewayError::validation(format!(
            "Invalid base address '{}': query and fragment are not allowed",
            candidate.trim()
        )));
    }
    Ok(url)
}

fn parse_http_url(candidate: &str) -> Result<Url, GatewayError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(GatewayError::validation(messages::BASE_ADDRESS_EMPTY));
    }
    let url = Url::parse(candidate).map_err(|e| {
        GatewayError::validation(format!("Invalid base address '{candidate}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::validation(format!(
            "Invalid base address '{candidate}': unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(GatewayError::validation(format!(
            "Invalid base address '{candidate}': missing host"
        )));
    }
    Ok(url)
}
