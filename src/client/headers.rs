//! Request header assembly.

use crate::error::GatewayError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// Builds the header map of one outgoing request.
#[derive(Debug, Default)]
pub struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the auth token under the configured header name.
    pub fn with_auth(self, header_name: &str, value: &str) -> Result<Self, GatewayError> {
        // Never echo the token itself in the error.
        let name = parse_name(header_name)?;
        let value = HeaderValue::from_str(value).map_err(|_| {
            GatewayError::ConfigurationError(format!(
                "Auth token is not a valid value for header '{header_name}'"
            ))
        })?;
        let mut this = self;
        this.headers.insert(name, value);
        Ok(this)
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, GatewayError> {
        let header_name = parse_name(name)?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                GatewayError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add multiple custom headers. Later calls override earlier ones.
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, GatewayError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

fn parse_name(name: &str) -> Result<HeaderName, GatewayError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        GatewayError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
    })
}
