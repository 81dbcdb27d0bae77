mod cli;
mod commands {
    pub mod extract;
    pub mod records;
    pub mod save;
    pub mod verify;
}
mod logging;

use clap::Parser;
use cli::{Cli, Command};
use dm_core::app_error::AppResult;
use dm_core::config::{apply_env_overrides, load_config, ConfigV1};
use std::path::Path;

fn resolve_config(cli: &Cli) -> AppResult<ConfigV1> {
    let mut config = load_config(cli.config.as_deref().map(Path::new))?;
    apply_env_overrides(&mut config);
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", err.code, err.message);
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.log.filter, cli.verbose);

    let result = match &cli.cmd {
        Command::Extract { path, json } => {
            commands::extract::run_extract(&config, path, *json).map(|_| 0)
        }
        Command::Save { path } => commands::save::run_save(&config, path).map(|_| 0),
        Command::List => commands::records::run_list(&config).map(|_| 0),
        Command::Show { id } => commands::records::run_show(&config, *id),
        Command::Verify { id, path } => commands::verify::run_verify(&config, *id, path),
        Command::History { filename } => {
            commands::records::run_history(&config, filename).map(|_| 0)
        }
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::debug!(details = %err.details, retryable = err.retryable, "command failed");
            eprintln!("{}: {}", err.code, err.message);
            std::process::exit(1);
        }
    }
}
