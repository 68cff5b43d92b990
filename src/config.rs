use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

fn default_data_dir() -> String {
    if let Some(data) = dirs::data_dir() {
        data.join("nightly").to_string_lossy().to_string()
    } else {
        "./nightly".to_string()
    }
}

fn default_location() -> String {
    "Your Location".to_string()
}

fn default_preview_chars() -> usize {
    120
}

fn default_tab_size() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            location: default_location(),
            preview_chars: default_preview_chars(),
            tab_size: default_tab_size(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Reads the config at `path`, falling back to defaults (and writing them out)
    /// when the file is missing.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            let mut config: Config = toml::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "error parsing config file, using defaults");
                Self::default()
            });

            // Expand tilde in data_dir
            if config.data_dir.starts_with('~') {
                if let Some(home) = dirs::home_dir() {
                    config.data_dir = config.data_dir.replacen('~', &home.to_string_lossy(), 1);
                }
            }

            config
        } else {
            let default_config = Self::default();
            if let Err(e) = default_config.save_to(path) {
                warn!(path = %path.display(), error = %e, "error creating default config file");
            }
            default_config
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;

        Ok(())
    }

    /// Location of the durable session slot.
    pub fn session_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("nightly-letters.json")
    }

    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("nightly");
        path.push("config.toml");
        path
    }
}
