use serde_json::Value;
use thiserror::Error;

/// Top-level error type for the `reqstate-api` crate.
///
/// Every failure a transport can surface. The request controller never
/// re-raises these: it folds them into a working result and classifies
/// that the same way as a regular response body.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The merged request config carried no URL.
    #[error("Request has no URL")]
    MissingUrl,

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Response ────────────────────────────────────────────────────
    /// The server answered with a non-success HTTP status.
    ///
    /// `body` holds the decoded JSON payload when the server sent one.
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// Response body was not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Cancellation ────────────────────────────────────────────────
    /// The call was aborted through its [`CancelHandle`](crate::CancelHandle).
    #[error("Request cancelled: {reason}")]
    Cancelled { reason: String },
}

impl Error {
    /// The response payload attached to this failure, if the server sent one.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Consume the error, handing back its response payload or itself.
    pub fn into_response_body(self) -> Result<Value, Self> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => Ok(body),
            other => Err(other),
        }
    }

    /// Returns `true` if the call was aborted by a cancellation handle.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
