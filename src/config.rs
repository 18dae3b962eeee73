use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub delete: DeleteSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_threshold")]
    pub threshold_bytes: u64,
}

fn default_threshold() -> u64 {
    100 * 1024 * 1024
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            threshold_bytes: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSettings {
    #[serde(default = "default_system_volume")]
    pub system_volume: String,
    #[serde(default = "default_true")]
    pub use_fallback: bool,
}

#[cfg(unix)]
fn default_system_volume() -> String {
    "/".to_string()
}

#[cfg(windows)]
fn default_system_volume() -> String {
    "C:".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DeleteSettings {
    fn default() -> Self {
        Self {
            system_volume: default_system_volume(),
            use_fallback: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bigclean")
            .join("config.toml")
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "scan.threshold_bytes" => self.scan.threshold_bytes = value.parse()?,
            "delete.system_volume" => self.delete.system_volume = value.to_string(),
            "delete.use_fallback" => self.delete.use_fallback = value.parse()?,
            _ => bail!("unknown config key: {key}"),
        }
        Ok(())
    }
}
