//! Application configuration management.
//!
//! Holds the noqe origin, the cache name, and the precache route manifest.
//! The manifest is static and baked in at deployment time; the config file
//! can override it but nothing adds, removes, or expires entries at runtime.
//!
//! Configuration is stored at `~/.config/noqe-sw/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "noqe-sw";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Name of the cache the precache worker populates.
pub const DEFAULT_CACHE_NAME: &str = "noqe-cache-v1";

/// Default origin of the noqe app (Flask dev server).
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Routes precached at install time.
pub const DEFAULT_PRECACHE_ROUTES: [&str; 7] = [
    "/",
    "/start",
    "/training",
    "/focus",
    "/duration",
    "/physical",
    "/players-count",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    #[serde(default = "default_precache_routes")]
    pub precache_routes: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cache_name() -> String {
    DEFAULT_CACHE_NAME.to_string()
}

fn default_precache_routes() -> Vec<String> {
    DEFAULT_PRECACHE_ROUTES.iter().map(|r| r.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cache_name: default_cache_name(),
            precache_routes: default_precache_routes(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Parent directory for disk-backed cache stores.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
