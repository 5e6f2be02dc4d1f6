//! Error Handling Module
//!
//! Every gateway failure is a `GatewayError`. Callers branch on
//! [`GatewayError::kind`] and [`GatewayError::code`] instead of parsing the
//! display text.
//!
//! # Example
//!
//! ```rust,ignore
//! use console_core::error::{ErrorKind, GatewayError};
//!
//! let error = GatewayError::session_expired("please log in", Some(302));
//! assert_eq!(error.kind(), ErrorKind::SessionExpired);
//! assert_eq!(error.code(), Some(302));
//! ```

mod conversions;
pub mod types;

pub use types::*;
