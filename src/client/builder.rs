//! Gateway client builder.

use super::{BaseAddress, GatewayClient, parse_base_address};
use crate::auth::{StorageTokenProvider, TokenProvider};
use crate::config::GatewayConfig;
use crate::envelope::{CodeEnvelope, EnvelopeStrategy};
use crate::error::GatewayError;
use crate::interceptor::GatewayInterceptor;
use crate::notify::{Notifier, TracingNotifier};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// Assembles a [`GatewayClient`].
///
/// Defaults: [`CodeEnvelope`], [`TracingNotifier`], a [`ReqwestTransport`]
/// built from the config, and a [`StorageTokenProvider`] over the token
/// store (an in-memory store unless one is given).
#[derive(Default)]
pub struct GatewayClientBuilder {
    config: Option<GatewayConfig>,
    base_address: Option<String>,
    envelope: Option<Arc<dyn EnvelopeStrategy>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    token_store: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    transport: Option<Arc<dyn HttpTransport>>,
    interceptors: Vec<Arc<dyn GatewayInterceptor>>,
}

impl GatewayClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Initial base address; overrides the one in the config.
    pub fn base_address(mut self, url: impl Into<String>) -> Self {
        self.base_address = Some(url.into());
        self
    }

    pub fn envelope<E: EnvelopeStrategy + 'static>(mut self, envelope: E) -> Self {
        self.envelope = Some(Arc::new(envelope));
        self
    }

    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Read the token from this store under the configured token key.
    /// Ignored when an explicit token provider is set.
    pub fn token_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Append an interceptor. Interceptors run in insertion order.
    pub fn interceptor(mut self, interceptor: Arc<dyn GatewayInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(base) = self.base_address {
            config.base_address = base;
        }
        let initial = parse_base_address(&config.base_address).map_err(|e| {
            GatewayError::ConfigurationError(format!("Initial base address: {}", e.message()))
        })?;

        let tokens = match self.token_provider {
            Some(provider) => provider,
            None => {
                let store = self
                    .token_store
                    .unwrap_or_else(|| Arc::new(MemoryStore::new()));
                Arc::new(StorageTokenProvider::new(store, config.token_key.clone()))
            }
        };
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };
        let envelope = self
            .envelope
            .unwrap_or_else(|| Arc::new(CodeEnvelope::default()));

        tracing::debug!(target: "console_core::http", base=%initial, envelope=envelope.name(), with_credentials=config.with_credentials, "gateway client built");

        Ok(GatewayClient {
            config: Arc::new(config),
            base_address: BaseAddress::new(initial),
            envelope,
            tokens,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            transport,
            interceptors: Arc::from(self.interceptors),
            next_request_id: Arc::new(AtomicU64::new(1)),
        })
    }
}
