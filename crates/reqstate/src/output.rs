//! Output formatting: JSON and YAML renderings of request state and config.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use reqstate_core::{RequestError, RequestState};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Serializable view of a [`RequestState`] over raw JSON payloads.
#[derive(Debug, Serialize)]
pub struct StateView<'a> {
    pub loading: bool,
    pub error: Option<ErrorView<'a>>,
    pub data: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorView<'a> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a Value>,
}

impl<'a> From<&'a RequestState<Value>> for StateView<'a> {
    fn from(state: &'a RequestState<Value>) -> Self {
        Self {
            loading: state.loading,
            error: state.error.as_ref().map(ErrorView::from),
            data: state.data.as_ref(),
        }
    }
}

impl<'a> From<&'a RequestError> for ErrorView<'a> {
    fn from(err: &'a RequestError) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
            body: err.body(),
        }
    }
}

/// Render any serializable value in the chosen format.
pub fn render<T: Serialize + ?Sized>(format: OutputFormat, data: &T) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    };
    Ok(rendered)
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", output.trim_end());
}
