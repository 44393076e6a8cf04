use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for NetCon
#[derive(Parser, Debug, Clone)]
#[command(
    name = "netcon",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactive line-oriented TCP console with Lua scripting",
    long_about = "Type lines to send them to the current TCP connection. Lines starting with '/' are evaluated as Lua, where connect(\"host:port\") opens a connection."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path, replacing the global and project files
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Connect to this target (host:port or host alias) once the UI is up
    #[arg(long, value_name = "TARGET")]
    pub connect: Option<String>,

    /// Command to execute; the interactive console when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive console
    Tui,
    /// Configuration management commands
    Config(ConfigArgs),
    /// Display version information
    Version,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write a default configuration file
    Init {
        /// Directory to create .netcon/config.toml in (defaults to the current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Write the global configuration file instead
        #[arg(long, conflicts_with = "path")]
        global: bool,
    },
    /// List configured host aliases
    Hosts {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

impl Args {
    /// The command to run, defaulting to the interactive console.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Tui)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_runs_console() {
        let args = Args::try_parse_from(["netcon", "--connect", "localhost:7"]).unwrap();
        assert_eq!(args.command_or_default(), Command::Tui);
        assert_eq!(args.connect.as_deref(), Some("localhost:7"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["netcon", "config", "show", "--format", "json", "-v", "-c", "/tmp/n.toml"])
            .unwrap();
        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/n.toml")));
        assert_eq!(
            args.command,
            Some(Command::Config(ConfigArgs {
                command: ConfigCommand::Show {
                    format: OutputFormat::Json
                }
            }))
        );
    }

    #[test]
    fn test_init_path_conflicts_with_global() {
        assert!(Args::try_parse_from(["netcon", "config", "init", "--path", "/tmp", "--global"]).is_err());
    }
}
