use crate::domain::{
    config::{GlobalConfig, HostAlias, NetConConfig},
    error::{NetConError, NetConResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> NetConResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_project_config_path(&dir));

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Create a manager over explicit paths
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration from files
    pub fn load_config(&self) -> NetConResult<NetConConfig> {
        // Start with default configuration
        let mut config = NetConConfig::default();

        // Load global configuration if exists
        if self.global_config_path.exists() {
            config = Self::load_config_from_path(&self.global_config_path)?;
        }

        // Project configuration only contributes host aliases
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                let project_config = Self::load_config_from_path(project_path)?;
                config.hosts.extend(project_config.hosts);
            }
        }

        Ok(config)
    }

    /// Get global configuration path
    fn get_global_config_path() -> NetConResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| NetConError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("netcon").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path(start: &Path) -> Option<PathBuf> {
        let mut path = start;

        loop {
            let config_path = path.join(".netcon").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(path: &Path) -> NetConResult<NetConConfig> {
        let content = fs::read_to_string(path).map_err(|e| NetConError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| NetConError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path
    pub fn save_config_to_path(&self, path: &Path, config: &NetConConfig) -> NetConResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| NetConError::Config {
                message: format!("Failed to create config directory {}: {}", parent.display(), e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| NetConError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| NetConError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration, returning the file written
    pub fn init_project_config(&self, path: &Path) -> NetConResult<PathBuf> {
        let config_file = path.join(".netcon").join("config.toml");

        if config_file.exists() {
            return Err(NetConError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        let default_config = NetConConfig {
            global: GlobalConfig::default(),
            hosts: vec![HostAlias {
                name: "local-echo".to_string(),
                address: "127.0.0.1:7".to_string(),
                description: "Echo service on this machine".to_string(),
            }],
        };

        self.save_config_to_path(&config_file, &default_config)?;

        Ok(config_file)
    }

    /// Get the current project config path (if any)
    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> ConfigManager {
        ConfigManager::with_paths(
            dir.path().join("global").join("config.toml"),
            Some(dir.path().join(".netcon").join("config.toml")),
        )
    }

    #[test]
    fn test_load_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = manager_in(&temp_dir).load_config().unwrap();

        assert_eq!(config.global.log_level, "info");
        assert_eq!(config.global.quit_window_ms, 1000);
        assert!(config.hosts.is_empty());
    }

    #[test]
    fn test_init_project_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);

        let written = manager.init_project_config(temp_dir.path()).unwrap();
        assert!(written.exists());

        let config = manager.load_config().unwrap();
        assert_eq!(config.hosts.len(), 1);
        assert_eq!(config.hosts[0].name, "local-echo");

        assert!(manager.init_project_config(temp_dir.path()).is_err());
    }

    #[test]
    fn test_project_hosts_extend_global() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager_in(&temp_dir);

        let mut global = NetConConfig::default();
        global.global.connect_timeout_ms = 750;
        global.hosts.push(HostAlias {
            name: "global-host".to_string(),
            address: "10.0.0.1:23".to_string(),
            description: String::new(),
        });
        manager
            .save_config_to_path(manager.get_global_config_path_ref(), &global)
            .unwrap();
        manager.init_project_config(temp_dir.path()).unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config.global.connect_timeout_ms, 750);
        let names: Vec<_> = config.hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["global-host", "local-echo"]);
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        manager_in(&temp_dir).init_project_config(temp_dir.path()).unwrap();

        let found = ConfigManager::find_project_config_path(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(".netcon").join("config.toml"));
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        fs::write(&path, "global = 3").unwrap();

        let err = ConfigManager::load_config_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
