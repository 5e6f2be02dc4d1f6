//! # console-core
//!
//! Shared runtime for the admin consoles: the HTTP gateway client that every
//! CRUD screen talks through, and the modal bridge that lets any caller open a
//! dialog and await the user's decision.
//!
//! ## Gateway client
//!
//! ```rust,no_run
//! use console_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), GatewayError> {
//!     let client = GatewayClient::builder()
//!         .base_address("https://admin.example.com/api")
//!         .envelope(SuccessFlagEnvelope::default())
//!         .build()?;
//!
//!     // Only the unwrapped `data` payload comes back.
//!     let wallets = client.get("/wallets", RequestOptions::default()).await?;
//!     println!("{wallets}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modal bridge
//!
//! ```rust,no_run
//! use console_core::modal::{ModalOptions, create};
//!
//! # async fn demo() {
//! let (controller, node) = create::<&str, serde_json::Value>("Edit wallet", ModalOptions::default());
//! // `node` is handed to the renderer; the caller just awaits.
//! let outcome = controller.open();
//! # drop(node);
//! let _ = outcome.await;
//! # }
//! ```

#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod defaults;
pub mod envelope;
pub mod error;
pub mod health;
pub mod interceptor;
pub mod modal;
pub mod notify;
pub mod storage;
pub mod telemetry;
pub mod transport;

pub use error::GatewayError;

/// Commonly used types.
pub mod prelude {
    pub use crate::auth::{FnTokenProvider, StaticTokenProvider, StorageTokenProvider, TokenProvider};
    pub use crate::client::{GatewayClient, GatewayClientBuilder, RequestOptions};
    pub use crate::config::{AuthScheme, GatewayConfig};
    pub use crate::envelope::{CodeEnvelope, EnvelopeOutcome, EnvelopeStrategy, SuccessFlagEnvelope};
    pub use crate::error::{ErrorKind, GatewayError};
    pub use crate::modal::{ModalController, ModalNode, ModalOptions, ModalOutcome};
    pub use crate::notify::{Notifier, TracingNotifier};
    pub use crate::storage::{KeyValueStore, MemoryStore};
}
