use super::{EnvelopeOutcome, EnvelopeStrategy, envelope_message};
use serde_json::Value;

/// Boolean-flag envelope: `{"success": true, "data": ..., "message": "..."}`.
///
/// This convention has no in-body session signal; expiry is an HTTP `401`.
#[derive(Debug, Clone)]
pub struct SuccessFlagEnvelope {
    unauthorized_status: u16,
}

impl Default for SuccessFlagEnvelope {
    fn default() -> Self {
        Self {
            unauthorized_status: 401,
        }
    }
}

impl SuccessFlagEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_unauthorized_status(mut self, status: u16) -> Self {
        self.unauthorized_status = status;
        self
    }
}

impl EnvelopeStrategy for SuccessFlagEnvelope {
    fn name(&self) -> &'static str {
        "success_flag"
    }

    fn classify(&self, body: Value) -> EnvelopeOutcome {
        let Value::Object(mut obj) = body else {
            return EnvelopeOutcome::Failure {
                message: None,
                code: None,
            };
        };
        let message = envelope_message(&obj);
        let code = obj.get("code").and_then(Value::as_i64);

        if obj.get("success").and_then(Value::as_bool) == Some(true) {
            EnvelopeOutcome::Success(obj.remove("data").unwrap_or(Value::Null))
        } else {
            EnvelopeOutcome::Failure { message, code }
        }
    }

    fn is_session_expired_status(&self, status: u16) -> bool {
        status == self.unauthorized_status
    }
}
