//! Unified path management for pawfinder files.
//!
//! Configuration, favorites and logs are resolved here so every component
//! agrees on where things live, on every platform.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "pawfinder";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for pawfinder_core::PawError {
    fn from(err: PathError) -> Self {
        pawfinder_core::PawError::config(err.to_string())
    }
}

/// Unified path management for pawfinder.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/pawfinder/         # Config directory
/// ├── config.toml              # Application configuration
/// └── logs/                    # Application logs
///     └── pawfinder.log.YYYY-MM-DD
///
/// ~/.local/share/pawfinder/    # Data directory
/// └── favorites.json           # Favorite dog ids
/// ```
///
/// With a base path, both directories collapse into that base, which keeps
/// tests away from the real home directory.
#[derive(Debug, Clone, Default)]
pub struct PawfinderPaths {
    base: Option<PathBuf>,
}

impl PawfinderPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the pawfinder configuration directory (e.g. `~/.config/pawfinder/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the pawfinder data directory (e.g. `~/.local/share/pawfinder/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the favorites file.
    pub fn favorites_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("favorites.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
