//! Client configuration, persisted as JSON in the platform config directory.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment override for the API root, checked before the config file.
const API_ROOT_ENV: &str = "EXPLANNER_API_ROOT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base path of the backend API, without a trailing slash.
    pub api_root: String,
    /// Interval between proactive token refreshes.
    pub refresh_interval_secs: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: "https://explanner.pythonanywhere.com/api".to_string(),
            // The backend issues access tokens outliving this window; firing
            // a little early keeps a valid token on hand at all times.
            refresh_interval_secs: 17 * 60,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let mut config = Self::load_from_disk().unwrap_or_default();
        if let Ok(api_root) = std::env::var(API_ROOT_ENV) {
            let api_root = api_root.trim();
            if !api_root.is_empty() {
                config.api_root = api_root.trim_end_matches('/').to_string();
            }
        }
        config
    }

    fn load_from_disk() -> Option<Self> {
        let config_dir = dirs()?.config_dir().to_path_buf();
        let config_path = config_dir.join("config.json");
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring malformed config at {:?}: {}", config_path, e);
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(proj_dirs) = dirs() {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            let config_path = config_dir.join("config.json");
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "explanner", "explanner-client")
}
