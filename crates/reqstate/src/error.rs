//! CLI error types with miette diagnostics.
//!
//! Maps `RequestError` and config failures into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use reqstate_config::ConfigError;
use reqstate_core::RequestError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const HTTP_STATUS: i32 = 4;
    pub const CANCELLED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(reqstate::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Switch target with --env or --base-url."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(reqstate::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Request was cancelled: {reason}")]
    #[diagnostic(code(reqstate::cancelled))]
    Cancelled { reason: String },

    // ── Responses ────────────────────────────────────────────────────
    #[error("Server rejected the request (code {code})")]
    #[diagnostic(
        code(reqstate::rejected),
        help("The full response body is in the printed state under `error.body`.")
    )]
    Rejected { code: String },

    #[error("HTTP {status} without an envelope body")]
    #[diagnostic(code(reqstate::http_status))]
    HttpStatus { status: u16 },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(reqstate::invalid_response),
        help("The server must answer with a JSON object shaped {{code, data}}.")
    )]
    InvalidResponse { message: String },

    #[error("Request failed: {message}")]
    #[diagnostic(code(reqstate::request_failed))]
    RequestFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(reqstate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(reqstate::config),
        help(
            "Check the config file (`reqstate config path`) and REQSTATE_* variables.\n\
             Known environments: development, production."
        )
    )]
    Config(#[from] ConfigError),

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(reqstate::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error("Could not build HTTP client: {0}")]
    #[diagnostic(code(reqstate::client))]
    Client(#[from] reqstate_api::Error),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(reqstate::json), help("Check the JSON argument and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(reqstate::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::HttpStatus { .. } => exit_code::HTTP_STATUS,
            Self::Validation { .. } | Self::ConfigExists { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate the error recorded in a controller's state.
    pub fn from_request(err: &RequestError, url: &str) -> Self {
        match err {
            RequestError::Rejected(_) => Self::Rejected {
                code: err.code().unwrap_or("missing").to_owned(),
            },
            RequestError::Transport(inner) => match inner.as_ref() {
                reqstate_api::Error::Timeout { timeout_secs } => Self::Timeout {
                    seconds: *timeout_secs,
                },
                reqstate_api::Error::Cancelled { reason } => Self::Cancelled {
                    reason: reason.clone(),
                },
                reqstate_api::Error::Status { status, .. } => Self::HttpStatus { status: *status },
                reqstate_api::Error::Transport(e) if e.is_connect() => Self::ConnectionFailed {
                    url: url.to_owned(),
                    reason: e.to_string(),
                },
                other => Self::RequestFailed {
                    message: other.to_string(),
                },
            },
            RequestError::InvalidShape { .. } | RequestError::Payload { .. } => {
                Self::InvalidResponse {
                    message: err.to_string(),
                }
            }
            RequestError::Params { message } => Self::Validation {
                field: "params".into(),
                reason: message.clone(),
            },
        }
    }
}
