use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// NetCon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetConConfig {
    /// Global configuration
    #[serde(default)]
    pub global: GlobalConfig,
    /// Named connection targets
    #[serde(default)]
    pub hosts: Vec<HostAlias>,
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file; the terminal belongs to the UI so logs go here
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Dial timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Window for the second Ctrl-C, in milliseconds
    #[serde(default = "default_quit_window")]
    pub quit_window_ms: u64,
    /// Lines kept in the output pane
    #[serde(default = "default_scrollback_lines")]
    pub scrollback_lines: usize,
    /// Read chunk size for connection readers
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// UI poll interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Submitted lines remembered for Up/Down recall
    #[serde(default = "default_input_history")]
    pub input_history: usize,
    /// Echo sent lines into the output pane
    #[serde(default = "default_local_echo")]
    pub local_echo: bool,
}

/// A named connection target usable as `connect("name")`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostAlias {
    /// Alias name
    pub name: String,
    /// `host:port` address
    pub address: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_quit_window() -> u64 {
    1000
}

fn default_scrollback_lines() -> usize {
    1000
}

fn default_read_buffer_size() -> usize {
    4096
}

fn default_tick_rate() -> u64 {
    50
}

fn default_input_history() -> usize {
    100
}

fn default_local_echo() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
            connect_timeout_ms: default_connect_timeout(),
            quit_window_ms: default_quit_window(),
            scrollback_lines: default_scrollback_lines(),
            read_buffer_size: default_read_buffer_size(),
            tick_rate_ms: default_tick_rate(),
            input_history: default_input_history(),
            local_echo: default_local_echo(),
        }
    }
}

impl GlobalConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn quit_window(&self) -> Duration {
        Duration::from_millis(self.quit_window_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl NetConConfig {
    /// Look up a host alias by name
    pub fn host(&self, name: &str) -> Option<&HostAlias> {
        self.hosts.iter().find(|host| host.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = NetConConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: NetConConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.global.quit_window_ms, 1000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: NetConConfig = toml::from_str(
            r#"
            [global]
            connect_timeout_ms = 250

            [[hosts]]
            name = "echo"
            address = "127.0.0.1:7"
            "#,
        )
        .unwrap();

        assert_eq!(config.global.connect_timeout(), Duration::from_millis(250));
        assert_eq!(config.global.scrollback_lines, 1000);
        assert!(config.global.local_echo);
        assert_eq!(config.host("echo").map(|h| h.address.as_str()), Some("127.0.0.1:7"));
        assert!(config.host("missing").is_none());
    }

    #[test]
    fn test_empty_config() {
        let config: NetConConfig = toml::from_str("").unwrap();
        assert_eq!(config.global.log_level, "info");
        assert!(config.hosts.is_empty());
    }
}
