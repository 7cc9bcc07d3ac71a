use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platform::PingOptions;

/// Persisted defaults for the CLI: the target to probe when none is
/// given and the options applied to each run.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub target: String,
    #[serde(default)]
    pub options: PingOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target: "8.8.8.8".to_string(),
            options: PingOptions {
                count: Some(3),
                ..PingOptions::default()
            },
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir()
            .ok_or("Could not find config directory")?
            .join("net-ping");

        fs::create_dir_all(&config_dir)?;
        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .ok()
            .filter(|path| path.exists())
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!("ignoring malformed config file: {e}");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}
