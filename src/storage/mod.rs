//! Persistent key-value storage
//!
//! The consoles keep the auth token in a small string-to-string store that
//! outlives the process, playing the part local storage plays in a browser.
//! The login flow writes it, the gateway reads it on every request.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::GatewayError;

/// A string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), GatewayError>;

    fn remove(&self, key: &str) -> Result<(), GatewayError>;
}
