//! Response envelope strategies
//!
//! Backends wrap every response body in an envelope carrying a status
//! indicator next to the payload. The gateway client delegates the decision
//! "success, session expired, or failure" to an `EnvelopeStrategy` chosen at
//! construction time, so one client implementation serves backends with
//! different envelope contracts.
//!
//! Two conventions ship with the crate:
//! - [`CodeEnvelope`]: `{code, data, message}`, success on `code == 200`,
//!   session expired on `code == 302`.
//! - [`SuccessFlagEnvelope`]: `{success, data, message}`, success on
//!   `success == true`, session expired on HTTP `401`.

mod code;
mod success_flag;

pub use code::CodeEnvelope;
pub use success_flag::SuccessFlagEnvelope;

use serde_json::Value;

/// Result of classifying one response.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome {
    /// The unwrapped `data` payload (`Value::Null` when absent).
    Success(Value),
    SessionExpired {
        message: Option<String>,
        code: Option<i64>,
    },
    Failure {
        message: Option<String>,
        code: Option<i64>,
    },
}

/// Decides how a decoded response body maps onto success or failure.
pub trait EnvelopeStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Classify a decoded response body.
    fn classify(&self, body: Value) -> EnvelopeOutcome;

    /// Whether an HTTP status signals session expiry on its own, before the
    /// body is looked at.
    fn is_session_expired_status(&self, _status: u16) -> bool {
        false
    }
}

/// Pull a human-readable message out of an envelope, accepting the field
/// names the consoles' backends use.
pub(crate) fn envelope_message(body: &serde_json::Map<String, Value>) -> Option<String> {
    ["message", "msg"]
        .iter()
        .find_map(|k| body.get(*k).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}
