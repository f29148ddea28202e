use crate::domain::{
    config::SwarmConfig,
    error::{SwarmError, SwarmResult},
};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
///
/// Resolves the effective configuration from, in order of precedence: an
/// explicit path, a project-local `.swarmcom/config.toml` found by walking
/// up from the working directory, the global config under the user's config
/// directory, and built-in defaults.
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> SwarmResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Load the effective configuration
    pub fn load_config(&self) -> SwarmResult<SwarmConfig> {
        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                return Self::load_config_from_path(project_path);
            }
        }

        if self.global_config_path.exists() {
            return Self::load_config_from_path(&self.global_config_path);
        }

        Ok(SwarmConfig::default())
    }

    /// Save configuration to the global location
    pub fn save_config(&self, config: &SwarmConfig) -> SwarmResult<()> {
        if let Some(parent) = self.global_config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| SwarmError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        Self::save_config_to_path(&self.global_config_path, config)
    }

    /// Load configuration from a specific path
    pub fn load_config_from_path(path: &Path) -> SwarmResult<SwarmConfig> {
        let content = fs::read_to_string(path).map_err(|e| SwarmError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: SwarmConfig = toml::from_str(&content).map_err(|e| SwarmError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_config_to_path(path: &Path, config: &SwarmConfig) -> SwarmResult<()> {
        let content = toml::to_string_pretty(config).map_err(|e| SwarmError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SwarmError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> SwarmResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SwarmError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("swarmcom").join("config.toml"))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(".swarmcom").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }
}
