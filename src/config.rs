// Configuration Module

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

// Configuration Struct
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Root URL of the server hosting the organisation API
    pub api_base_url: String,
    /// First segment of every node path
    pub path_prefix: String,
    /// Units whose name or slug contains this keyword are always pushed at
    /// least one chart layer below their siblings
    pub depth_override_keyword: String,
    pub request_timeout_secs: u64,
}

// Default values for config if file doesn't exist
impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            path_prefix: "Anjab".to_string(),
            depth_override_keyword: "inspektorat".to_string(),
            request_timeout_secs: 30,
        }
    }
}

// Function to get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("id", "Pandawa", "PetaSync") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?; // Ensure config directory exists
        Ok(config_dir.join("petasync.toml"))
    } else {
        bail!("Could not determine configuration directory")
    }
}

// Load from the platform config dir, falling back to defaults when the file
// is absent
pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse TOML from config file: {:?}", config_path))
    } else {
        Ok(Config::default())
    }
}

// Function to save configuration
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path()?)
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    let config_str =
        toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;
    std::fs::write(config_path, config_str)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))
}
