//! Config subcommand handlers.

use serde::Serialize;

use reqstate_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::commands::{resolve_base_url, resolve_config};
use crate::error::CliError;
use crate::output;

/// Config as it will be used, with the file it came from and the base URL
/// the active environment selects.
#[derive(Serialize)]
struct Resolved<'a> {
    path: String,
    base_url: String,
    #[serde(flatten)]
    config: &'a Config,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = resolve_config(global)?;
            let base_url = resolve_base_url(&cfg, global)?;
            let resolved = Resolved {
                path: config::config_path().display().to_string(),
                base_url: base_url.to_string(),
                config: &cfg,
            };
            output::print_output(&output::render(global.output, &resolved)?);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            config::save_config_to(&Config::default(), &path)?;
            eprintln!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}
