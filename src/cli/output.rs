use crate::cli::args::OutputFormat;
use crate::domain::config::{HostAlias, NetConConfig};
use std::io;
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_config(&self, config: &NetConConfig) -> Result<(), OutputError>;
    fn write_hosts(&self, hosts: &[HostAlias]) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::NetConError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render_config(&self, config: &NetConConfig) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Table => Ok(render_host_table(&config.hosts)),
            OutputFormat::Text => {
                let global = &config.global;
                let log_file = global
                    .log_file
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), |path| path.display().to_string());

                let mut lines = vec![
                    "NetCon Configuration:".to_string(),
                    format!("  Log level: {}", global.log_level),
                    format!("  Log file: {}", log_file),
                    format!("  Connect timeout: {}ms", global.connect_timeout_ms),
                    format!("  Quit window: {}ms", global.quit_window_ms),
                    format!("  Scrollback: {} lines", global.scrollback_lines),
                    format!("  Read buffer: {} bytes", global.read_buffer_size),
                    format!("  Tick rate: {}ms", global.tick_rate_ms),
                    format!("  Input history: {}", global.input_history),
                    format!("  Local echo: {}", global.local_echo),
                ];
                if !config.hosts.is_empty() {
                    lines.push("  Hosts:".to_string());
                    lines.extend(config.hosts.iter().map(|host| format!("    {}", describe_host(host))));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    pub fn render_hosts(&self, hosts: &[HostAlias]) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(hosts)?),
            OutputFormat::Table => Ok(render_host_table(hosts)),
            OutputFormat::Text => Ok(hosts.iter().map(describe_host).collect::<Vec<_>>().join("\n")),
        }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_config(&self, config: &NetConConfig) -> Result<(), OutputError> {
        println!("{}", self.render_config(config)?);
        Ok(())
    }

    fn write_hosts(&self, hosts: &[HostAlias]) -> Result<(), OutputError> {
        if hosts.is_empty() {
            return self.write_message("No host aliases configured");
        }
        println!("{}", self.render_hosts(hosts)?);
        Ok(())
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "message": message,
                    "level": "info"
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                println!("{}", message);
            }
        }
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        match self.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "error": error,
                    "level": "error"
                });
                eprintln!("{}", serde_json::to_string_pretty(&output)?);
            }
            _ => {
                eprintln!("Error: {}", error);
            }
        }
        Ok(())
    }
}

fn describe_host(host: &HostAlias) -> String {
    if host.description.is_empty() {
        format!("{} -> {}", host.name, host.address)
    } else {
        format!("{} -> {} ({})", host.name, host.address, host.description)
    }
}

fn render_host_table(hosts: &[HostAlias]) -> String {
    Table::new(hosts.iter().map(HostTableRow::from)).to_string()
}

/// Table row for host aliases
#[derive(Tabled)]
struct HostTableRow {
    name: String,
    address: String,
    description: String,
}

impl From<&HostAlias> for HostTableRow {
    fn from(host: &HostAlias) -> Self {
        Self {
            name: host.name.clone(),
            address: host.address.clone(),
            description: host.description.clone(),
        }
    }
}
