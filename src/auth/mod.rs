//! Authentication helpers and token providers.
//!
//! The gateway asks its `TokenProvider` for a token on every outgoing request
//! and never caches the answer, so a login or logout elsewhere takes effect
//! on the very next call.

use crate::error::GatewayError;
use crate::storage::KeyValueStore;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Supplies the auth token for outgoing requests.
///
/// Notes:
/// - The interface is synchronous; it is called while the request headers
///   are assembled.
/// - Returning `None` (or an empty string) sends the request without an
///   authorization header.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Reads the token from a [`KeyValueStore`] under a fixed key.
pub struct StorageTokenProvider {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl StorageTokenProvider {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist a token, as the login flow does after a successful sign-in.
    pub fn store_token(&self, token: &str) -> Result<(), GatewayError> {
        self.store.set(&self.key, token)
    }

    /// Forget the stored token.
    pub fn clear_token(&self) -> Result<(), GatewayError> {
        self.store.remove(&self.key)
    }
}

impl TokenProvider for StorageTokenProvider {
    fn token(&self) -> Option<String> {
        self.store.get(&self.key).filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for StorageTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageTokenProvider")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// A simple static token provider useful for tests and service accounts
/// whose token is managed externally.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
        }
    }

    /// A provider that never returns a token.
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.expose_secret().to_string())
    }
}

/// Adapts a closure into a [`TokenProvider`].
pub struct FnTokenProvider<F> {
    f: F,
}

impl<F> FnTokenProvider<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TokenProvider for FnTokenProvider<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        (self.f)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn storage_provider_reads_fresh_on_every_call() {
        let store = Arc::new(MemoryStore::new());
        let provider = StorageTokenProvider::new(store.clone(), "token");
        assert_eq!(provider.token(), None);

        store.set("token", "first").unwrap();
        assert_eq!(provider.token().as_deref(), Some("first"));

        provider.store_token("second").unwrap();
        assert_eq!(provider.token().as_deref(), Some("second"));

        provider.clear_token().unwrap();
        assert_eq!(provider.token(), None);
    }

    #[test]
    fn empty_stored_token_counts_as_absent() {
        let store = Arc::new(MemoryStore::with_entry("token", ""));
        let provider = StorageTokenProvider::new(store, "token");
        assert_eq!(provider.token(), None);
    }

    #[test]
    fn static_provider_does_not_leak_token_in_debug() {
        let provider = StaticTokenProvider::new("s3cr3t");
        assert_eq!(provider.token().as_deref(), Some("s3cr3t"));
        assert!(!format!("{provider:?}").contains("s3cr3t"));
        assert_eq!(StaticTokenProvider::anonymous().token(), None);
    }

    #[test]
    fn fn_provider_is_called_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = FnTokenProvider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("t".to_string())
        });
        provider.token();
        provider.token();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
