//! Command-line surface. Validated here so the runtime only sees clean input.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::menu::MenuKind;

#[derive(Debug, Parser)]
#[command(name = "shellmate", about = "Shellmate shell-plugin companion", version)]
pub struct Cli {
    #[command(flatten)]
    pub app: AppOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Clone)]
pub struct AppOptions {
    /// Disable colors in menu output
    #[arg(long = "no-color", global = true, default_value_t = false)]
    pub no_color: bool,

    /// Force ASCII box-drawing characters
    #[arg(long = "ascii", global = true, default_value_t = false)]
    pub ascii: bool,

    /// Enable side-channel debug logging (key events, transitions)
    #[arg(long = "logs", global = true, env = "SHELLMATE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", global = true, env = "SHELLMATE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Config file path override
    #[arg(long = "config", global = true, env = "SHELLMATE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl AppOptions {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive menu
    Menu {
        /// Which menu to open at the root
        #[arg(value_enum, default_value_t = MenuKind::Main)]
        kind: MenuKind,
    },
    /// Read or write plugin configuration values
    Config {
        #[command(subcommand)]
        op: ConfigOp,
    },
    /// Print environment diagnostics and exit
    Doctor,
}

#[derive(Debug, Subcommand)]
pub enum ConfigOp {
    /// Print the value stored under KEY
    Get { key: String },
    /// Store VALUE (parsed as JSON, falling back to a string) under KEY
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_defaults_to_main() {
        let cli = Cli::parse_from(["shellmate", "menu"]);
        match cli.command {
            Command::Menu { kind } => assert_eq!(kind, MenuKind::Main),
            _ => panic!("expected menu command"),
        }
    }

    #[test]
    fn menu_accepts_settings_kind() {
        let cli = Cli::parse_from(["shellmate", "menu", "settings"]);
        match cli.command {
            Command::Menu { kind } => assert_eq!(kind, MenuKind::Settings),
            _ => panic!("expected menu command"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["shellmate", "menu", "--ascii", "--no-color"]);
        assert!(cli.app.ascii);
        assert!(cli.app.no_color);
    }

    #[test]
    fn no_logs_wins_over_logs() {
        let cli = Cli::parse_from(["shellmate", "--logs", "--no-logs", "doctor"]);
        assert!(!cli.app.logging_enabled());
    }

    #[test]
    fn config_set_takes_key_and_value() {
        let cli = Cli::parse_from(["shellmate", "config", "set", "ui.animations", "true"]);
        match cli.command {
            Command::Config {
                op: ConfigOp::Set { key, value },
            } => {
                assert_eq!(key, "ui.animations");
                assert_eq!(value, "true");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn config_path_override_flag() {
        let cli = Cli::parse_from(["shellmate", "--config", "/tmp/x.json", "config", "path"]);
        assert_eq!(cli.app.config.as_deref(), Some(std::path::Path::new("/tmp/x.json")));
    }
}
