//! Unified path management for Snacksy files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/snacksy/           # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/snacksy/      # Data directory
//! ├── local_storage.json       # Key/value store (signed-in user)
//! ├── cookies.json             # Session cookies for the API origin
//! └── logs/
//!     └── snacksy.log.YYYY-MM-DD
//! ```
//!
//! When a base directory is supplied, both trees collapse into it
//! (`<base>/config.toml`, `<base>/local_storage.json`, ...). Tests and the
//! `--data-dir` flag use this.

use std::path::PathBuf;

const APP_DIR: &str = "snacksy";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
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

impl From<PathError> for snacksy_core::SnacksyError {
    fn from(err: PathError) -> Self {
        snacksy_core::SnacksyError::config(err.to_string())
    }
}

/// Resolves where Snacksy keeps its files.
#[derive(Debug, Clone, Default)]
pub struct SnacksyPaths {
    base: Option<PathBuf>,
}

impl SnacksyPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Directory holding `config.toml`.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Directory holding local storage, cookies and logs.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn local_storage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("local_storage.json"))
    }

    pub fn cookie_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("cookies.json"))
    }

    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_override() {
        let paths = SnacksyPaths::new(Some(PathBuf::from("/tmp/snacksy-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/snacksy-test/config.toml")
        );
        assert_eq!(
            paths.local_storage_file().unwrap(),
            PathBuf::from("/tmp/snacksy-test/local_storage.json")
        );
        assert_eq!(
            paths.cookie_file().unwrap(),
            PathBuf::from("/tmp/snacksy-test/cookies.json")
        );
        assert_eq!(
            paths.log_dir().unwrap(),
            PathBuf::from("/tmp/snacksy-test/logs")
        );
    }

    #[test]
    fn test_platform_dirs_end_with_app_dir() {
        let paths = SnacksyPaths::new(None);
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
        if let Ok(dir) = paths.data_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
