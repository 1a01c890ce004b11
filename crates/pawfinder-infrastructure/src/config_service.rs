//! Configuration loading.
//!
//! Reads `config.toml`, then applies environment overrides. A missing file
//! is not an error: defaults apply.

use std::path::{Path, PathBuf};

use pawfinder_core::config::AppConfig;
use pawfinder_core::error::{PawError, Result};

use crate::paths::PawfinderPaths;

/// Overrides `api.base_url`.
pub const ENV_BASE_URL: &str = "PAWFINDER_BASE_URL";
/// Overrides `log_level`.
pub const ENV_LOG: &str = "PAWFINDER_LOG";

/// Loads [`AppConfig`] from a TOML file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `~/.config/pawfinder/config.toml`.
    pub fn new_default() -> Result<Self> {
        Ok(Self::with_path(PawfinderPaths::default().config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file (if any) and applies environment overrides.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = self.load_file()?;
        apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            PawError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Writes a default config file if none exists yet.
    pub fn ensure_config_file(&self) -> Result<PathBuf> {
        if self.path.exists() {
            return Ok(self.path.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = toml::to_string_pretty(&AppConfig::default())?;
        std::fs::write(&self.path, template)?;
        tracing::info!(path = %self.path.display(), "created default config file");

        Ok(self.path.clone())
    }
}

/// Applies environment overrides. `lookup` is `std::env::var` outside tests.
fn apply_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.log_level = Some(level);
    }
}
