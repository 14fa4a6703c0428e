use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub textgen: TextGenSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let config_dir =
            dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join("screenbudget");

        Self { path: config_dir.join("screenbudget.db").to_string_lossy().to_string() }
    }
}

/// Settings for the external text-generation upstream. Disabled by default;
/// the engine falls back to the curated challenge bank without it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextGenSettings {
    pub enabled: bool,
    pub url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for TextGenSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 20,
        }
    }
}

impl ServiceConfig {
    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("screenbudget")
            .join("service.toml")
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        debug!("Loading service configuration from {:?}", config_path);

        if !config_path.exists() {
            info!(
                "Configuration file not found at {:?}, creating default configuration",
                config_path
            );
            let default_config = Self::default();
            default_config.save_to_path(config_path)?;
            return Ok(default_config);
        }

        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: ServiceConfig = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        info!("Loaded service configuration from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        debug!("Saving service configuration to {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let config_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(config_path, config_content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Saved service configuration to {:?}", config_path);
        Ok(())
    }
}
