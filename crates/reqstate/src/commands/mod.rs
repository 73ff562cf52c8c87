//! Command handlers and the config resolution they share.

pub mod config_cmd;
pub mod request;

use url::Url;

use reqstate_config::Config;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load config from file + environment, then apply global flag overrides.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = reqstate_config::load_config()?;
    if let Some(env) = global.env {
        cfg.environment = env;
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    Ok(cfg)
}

/// `--base-url` when given, otherwise the active environment's entry.
pub fn resolve_base_url(cfg: &Config, global: &GlobalOpts) -> Result<Url, CliError> {
    match global.base_url.as_deref() {
        Some(raw) => raw.parse().map_err(|_| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL: {raw}"),
        }),
        None => Ok(cfg.base_url()?),
    }
}
