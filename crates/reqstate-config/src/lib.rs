//! Shared configuration for reqstate consumers.
//!
//! TOML file + environment loading, environment-keyed base URL selection,
//! and translation to `reqstate_api::HttpTransportConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use url::Url;

use reqstate_api::{HttpTransportConfig, TlsMode};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Environment ─────────────────────────────────────────────────────

/// Deployment environment; selects which base URL requests go to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

// ── TOML config structs ─────────────────────────────────────────────

/// Base URL per environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BaseUrls {
    #[serde(default = "default_development_url")]
    pub development: String,
    #[serde(default = "default_production_url")]
    pub production: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            development: default_development_url(),
            production: default_production_url(),
        }
    }
}

fn default_development_url() -> String {
    "https://rysyclub.com/api".into()
}
fn default_production_url() -> String {
    "http://47.108.164.241/api".into()
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Active environment.
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub base_urls: BaseUrls,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Lifetime of cached responses in seconds. Unset means no expiry.
    pub cache_ttl: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_urls: BaseUrls::default(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            user_agent: default_user_agent(),
            cache_ttl: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("reqstate/", env!("CARGO_PKG_VERSION")).into()
}

impl Config {
    /// Base URL for the active environment.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        self.base_url_for(self.environment)
    }

    pub fn base_url_for(&self, environment: Environment) -> Result<Url, ConfigError> {
        let raw = match environment {
            Environment::Development => &self.base_urls.development,
            Environment::Production => &self.base_urls.production,
        };
        raw.parse().map_err(|_| ConfigError::Validation {
            field: format!("base_urls.{environment}"),
            reason: format!("invalid URL: {raw}"),
        })
    }

    pub fn transport(&self) -> HttpTransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        HttpTransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl.map(Duration::from_secs)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "reqstate", "reqstate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("reqstate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` layered under environment variables.
///
/// Precedence, lowest first: built-in defaults, the TOML file, `NODE_ENV`,
/// `REQSTATE_*` variables (nested keys split on `__`, e.g.
/// `REQSTATE_BASE_URLS__PRODUCTION`), and finally `REQSTATE_ENV`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::raw().only(&["NODE_ENV"]).map(|_| "environment".into()))
        .merge(Env::prefixed("REQSTATE_").ignore(&["ENV"]).split("__"))
        .merge(Env::raw().only(&["REQSTATE_ENV"]).map(|_| "environment".into()));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
