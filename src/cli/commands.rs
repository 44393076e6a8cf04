use crate::cli::args::{Args, Command, ConfigArgs, ConfigCommand, OutputFormat};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::domain::config::NetConConfig;
use crate::domain::error::{NetConError, NetConResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::{init_logging, LogTarget};
use crate::tui::app::App;
use anyhow::Context;
use std::path::PathBuf;

/// Execute CLI command
pub async fn execute_command(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args, ConfigManager::new)?;
    let command = args.command_or_default();

    let level = if args.verbose { "debug" } else { config.global.log_level.as_str() };
    init_logging(level, &log_target(&args, &config, &command)).context("Failed to initialize logging")?;

    match command {
        Command::Tui => {
            let mut app = App::new(&config).context("Failed to start the terminal UI")?;
            app.run(args.connect.as_deref()).await?;
            Ok(())
        }
        Command::Config(config_args) => {
            execute_config_command(config_args, &config, ConfigManager::new)?;
            Ok(())
        }
        Command::Version => {
            ConsoleWriter::new(OutputFormat::Text).write_message(&format!("netcon {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

/// Effective configuration: an explicit `--config` file replaces the discovered ones.
///
/// `discover` only runs without `--config`, so an explicit file works even
/// when no home directory can be found.
pub fn load_config<F>(args: &Args, discover: F) -> NetConResult<NetConConfig>
where
    F: FnOnce() -> NetConResult<ConfigManager>,
{
    match &args.config {
        Some(path) => ConfigManager::load_config_from_path(path),
        None => discover()?.load_config(),
    }
}

/// The console owns the terminal, so it only logs to a file.
pub fn log_target(args: &Args, config: &NetConConfig, command: &Command) -> LogTarget {
    let file = args.log_file.clone().or_else(|| config.global.log_file.clone());
    match (file, command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Command::Tui) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    }
}

fn execute_config_command<F>(args: ConfigArgs, config: &NetConConfig, discover: F) -> NetConResult<()>
where
    F: FnOnce() -> NetConResult<ConfigManager>,
{
    match args.command {
        ConfigCommand::Show { format } => {
            ConsoleWriter::new(format).write_config(config)?;
            Ok(())
        }
        ConfigCommand::Init { path, global } => {
            let writer = ConsoleWriter::new(OutputFormat::Text);
            let config_manager = discover()?;
            if global {
                let global_path = config_manager.get_global_config_path_ref();
                if global_path.exists() {
                    return Err(NetConError::Config {
                        message: format!("Global configuration already exists at '{}'", global_path.display()),
                    });
                }
                config_manager.save_config_to_path(global_path, &NetConConfig::default())?;
                writer.write_message(&format!("Global configuration initialized at '{}'", global_path.display()))?;
            } else {
                let dir = match path {
                    Some(path) => path,
                    None => current_dir()?,
                };
                let written = config_manager.init_project_config(&dir)?;
                writer.write_message(&format!("Project configuration initialized at '{}'", written.display()))?;
            }
            Ok(())
        }
        ConfigCommand::Hosts { format } => {
            ConsoleWriter::new(format).write_hosts(&config.hosts)?;
            Ok(())
        }
    }
}

fn current_dir() -> NetConResult<PathBuf> {
    std::env::current_dir().map_err(|e| NetConError::Config {
        message: format!("Failed to get current directory: {}", e),
    })
}
