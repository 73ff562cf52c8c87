//! Clap derive structures for the `reqstate` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use reqstate_config::Environment;
use reqstate_core::Method;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// reqstate -- issue envelope-style API calls and inspect the resulting state
#[derive(Debug, Parser)]
#[command(
    name = "reqstate",
    version,
    about = "Issue API requests and print the resulting loading/error/data state",
    long_about = "Drives a request controller against a `{code, data}` envelope API.\n\n\
        Responses with code \"000\" are unwrapped into `data`; anything else\n\
        is recorded as an error. The final state is printed on stdout.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Deployment environment selecting the base URL (overrides config)
    #[arg(long, short = 'e', global = true)]
    pub env: Option<Environment>,

    /// Base URL for relative paths (overrides environment selection)
    #[arg(long, short = 'b', env = "REQSTATE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue a request and print the final state
    #[command(alias = "req", alias = "r")]
    Request(RequestArgs),

    /// Inspect and manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Request ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method (get, post, put, patch, delete, head, options)
    pub method: Method,

    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// Request parameter as key=value; sent as query for get-like methods
    /// and as the JSON body for post/put/patch. Values that parse as JSON
    /// keep their type.
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Raw JSON request body (merged config `data`)
    #[arg(long)]
    pub body: Option<String>,

    /// Extra header as name:value
    #[arg(long = "header", short = 'H', value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// Cache the unwrapped response under this key
    #[arg(long)]
    pub cache_key: Option<String>,

    /// Issue the request N times through the same controller
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,

    /// Start all repeated calls at once instead of one after another
    #[arg(long)]
    pub concurrent: bool,

    /// Bypass the cache on every call
    #[arg(long)]
    pub force_refresh: bool,

    /// Cancel a still-running call when the next one starts
    #[arg(long)]
    pub cancel_previous: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
