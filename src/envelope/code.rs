use super::{EnvelopeOutcome, EnvelopeStrategy, envelope_message};
use serde_json::Value;

/// Numeric-code envelope: `{"code": 200, "data": ..., "message": "..."}`.
#[derive(Debug, Clone)]
pub struct CodeEnvelope {
    success_code: i64,
    session_expired_code: i64,
}

impl Default for CodeEnvelope {
    fn default() -> Self {
        Self {
            success_code: 200,
            session_expired_code: 302,
        }
    }
}

impl CodeEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_success_code(mut self, code: i64) -> Self {
        self.success_code = code;
        self
    }

    pub const fn with_session_expired_code(mut self, code: i64) -> Self {
        self.session_expired_code = code;
        self
    }
}

impl EnvelopeStrategy for CodeEnvelope {
    fn name(&self) -> &'static str {
        "code"
    }

    fn classify(&self, body: Value) -> EnvelopeOutcome {
        let Value::Object(mut obj) = body else {
            return EnvelopeOutcome::Failure {
                message: None,
                code: None,
            };
        };
        // Some endpoints send the code as a string.
        let code = match obj.get("code") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        let message = envelope_message(&obj);

        match code {
            Some(c) if c == self.success_code => {
                EnvelopeOutcome::Success(obj.remove("data").unwrap_or(Value::Null))
            }
            Some(c) if c == self.session_expired_code => {
                EnvelopeOutcome::SessionExpired { message, code }
            }
            _ => EnvelopeOutcome::Failure { message, code },
        }
    }
}
