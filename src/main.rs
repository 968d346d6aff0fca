//! Entrypoint: subcommand dispatch and exit-code mapping.
//!
//! Anything fatal prints one line to stderr and exits non-zero; the menu
//! itself guarantees the terminal is restored before we get here.

use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use serde_json::Value;

use shellmate::cli::{Cli, Command, ConfigOp};
use shellmate::config_store::JsonStore;
use shellmate::doctor;
use shellmate::runtime::{run_menu, MenuOptions};
use shellmate::{init_logging, log_debug, telemetry};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.app.logging_enabled());
    telemetry::init_tracing(cli.app.logging_enabled());
    log_debug("=== shellmate started ===");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shellmate: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli { app, command } = cli;
    match command {
        Command::Menu { kind } => run_menu(&MenuOptions {
            kind,
            no_color: app.no_color,
            ascii: app.ascii,
            config_path: app.config,
        }),
        Command::Config { op } => run_config(op, app.config.as_deref()),
        Command::Doctor => {
            println!("{}", doctor::base_report(app.config.as_deref()).render());
            Ok(())
        }
    }
}

fn run_config(op: ConfigOp, config_override: Option<&std::path::Path>) -> Result<()> {
    let mut store = JsonStore::open_default(config_override);
    match op {
        ConfigOp::Get { key } => match store.get(&key) {
            Some(value) => {
                println!("{value}");
                Ok(())
            }
            None => bail!("{key} is not set"),
        },
        ConfigOp::Set { key, value } => {
            // Accept JSON literals (true, 3, "x") and fall back to a plain string.
            let parsed =
                serde_json::from_str(&value).unwrap_or_else(|_| Value::String(value.clone()));
            if !store.set(&key, parsed) {
                bail!("could not write {}", store.path().display());
            }
            Ok(())
        }
        ConfigOp::Path => {
            println!("{}", store.path().display());
            Ok(())
        }
    }
}
