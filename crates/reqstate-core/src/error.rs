// ── Request error state ──
//
// What ends up in `RequestState::error`. Transport failures are folded in
// here rather than returned, so consumers watch one field for every
// failure mode.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Failure recorded in a controller's state after a call.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// The working result was an envelope whose code was not `"000"`.
    /// Holds the full body as received.
    #[error("Request rejected (code {})", code_label(.0))]
    Rejected(Value),

    /// The transport failed without a response body to classify.
    #[error("Transport failure: {0}")]
    Transport(Arc<reqstate_api::Error>),

    /// The working result was null or not a JSON object.
    #[error("Invalid response shape: expected a {{code, data}} object")]
    InvalidShape { body: Value },

    /// Caller parameters could not be turned into JSON.
    #[error("Invalid request parameters: {message}")]
    Params { message: String },

    /// A success envelope whose `data` did not match the expected payload type.
    #[error("Unexpected payload: {message}")]
    Payload { message: String },
}

impl RequestError {
    /// The raw body behind this error, when there is one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Rejected(body) | Self::InvalidShape { body } => Some(body),
            Self::Transport(err) => err.response_body(),
            Self::Params { .. } | Self::Payload { .. } => None,
        }
    }

    /// The envelope code of a rejected call.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Rejected(body) => body.get("code").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_cancelled())
    }
}

fn code_label(body: &Value) -> String {
    match body.get("code") {
        Some(Value::String(code)) => code.clone(),
        Some(other) => other.to_string(),
        None => "missing".into(),
    }
}
