//! Configuration loading.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. Built-in defaults ([`AppConfig::default`])
//! 2. `config.toml` in the config directory
//! 3. Process environment (`SNACKSY_*`, with the frontend's `VITE_*` names
//!    accepted as fallbacks)
//! 4. Explicit overrides (command-line flags)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snacksy_core::config::AppConfig;
use snacksy_core::error::{Result, SnacksyError};

use crate::paths::SnacksyPaths;
use crate::storage::AtomicFile;

pub const ENV_API_BASE_URL: &str = "SNACKSY_API_BASE_URL";
pub const ENV_GOOGLE_CLIENT_ID: &str = "SNACKSY_GOOGLE_CLIENT_ID";
pub const ENV_GOOGLE_REDIRECT_URI: &str = "SNACKSY_GOOGLE_REDIRECT_URI";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SNACKSY_REQUEST_TIMEOUT_SECS";

const ENV_VITE_API_BASE_URL: &str = "VITE_API_BASE_URL";
const ENV_VITE_GOOGLE_CLIENT_ID: &str = "VITE_GOOGLE_CLIENT_ID";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_base_url: Option<String>,
    pub google_client_id: Option<String>,
    pub google_redirect_uri: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

/// Values given explicitly by the caller, e.g. from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub google_client_id: Option<String>,
    pub google_redirect_uri: Option<String>,
    pub log_level: Option<String>,
}

/// Outcome of [`ConfigService::load_dotenv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

impl DotenvStatus {
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => {
                tracing::debug!("[Config] Loaded environment from {}", path.display())
            }
            Self::Missing => {}
            Self::Unreadable(e) => tracing::warn!("[Config] Ignoring unreadable .env file: {}", e),
        }
    }
}

/// Resolves [`AppConfig`] from file, environment and overrides.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: SnacksyPaths,
}

impl ConfigService {
    pub fn new(paths: SnacksyPaths) -> Self {
        Self { paths }
    }

    /// Loads a `.env` file from the working directory (or a parent) into the
    /// process environment. A missing file is fine.
    ///
    /// Runs before logging is set up, so the outcome is returned for the
    /// caller to [`log`](DotenvStatus::log) once a subscriber exists.
    pub fn load_dotenv() -> DotenvStatus {
        match dotenvy::dotenv() {
            Ok(path) => DotenvStatus::Loaded(path),
            Err(e) if e.not_found() => DotenvStatus::Missing,
            Err(e) => DotenvStatus::Unreadable(e.to_string()),
        }
    }

    /// Reads `config.toml`, if present.
    pub fn load_file(&self) -> Result<Option<ConfigFile>> {
        let file = AtomicFile::<ConfigFile>::toml(self.paths.config_file()?);
        Ok(file.load()?)
    }

    /// Writes `config.toml`.
    pub fn save_file(&self, config: &ConfigFile) -> Result<()> {
        let file = AtomicFile::<ConfigFile>::toml(self.paths.config_file()?);
        Ok(file.save(config)?)
    }

    /// Resolves the configuration from all layers using the process
    /// environment.
    pub fn load(&self, overrides: &ConfigOverrides) -> Result<AppConfig> {
        let file = self.load_file()?;
        Self::resolve(file, |key| std::env::var(key).ok(), overrides)
    }

    /// Merges the layers. `env` looks up an environment variable.
    pub fn resolve<E>(
        file: Option<ConfigFile>,
        env: E,
        overrides: &ConfigOverrides,
    ) -> Result<AppConfig>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env_var = |primary: &str, fallback: Option<&str>| {
            env(primary)
                .or_else(|| fallback.and_then(&env))
                .filter(|value| !value.trim().is_empty())
        };

        let mut config = AppConfig::default();

        if let Some(file) = file {
            if let Some(url) = file.api_base_url {
                config.api_base_url = url;
            }
            if file.google_client_id.is_some() {
                config.google_client_id = file.google_client_id;
            }
            if let Some(uri) = file.google_redirect_uri {
                config.google_redirect_uri = uri;
            }
            if file.request_timeout_secs.is_some() {
                config.request_timeout_secs = file.request_timeout_secs;
            }
            if let Some(level) = file.log_level {
                config.log_level = level;
            }
        }

        if let Some(url) = env_var(ENV_API_BASE_URL, Some(ENV_VITE_API_BASE_URL)) {
            config.api_base_url = url;
        }
        if let Some(id) = env_var(ENV_GOOGLE_CLIENT_ID, Some(ENV_VITE_GOOGLE_CLIENT_ID)) {
            config.google_client_id = Some(id);
        }
        if let Some(uri) = env_var(ENV_GOOGLE_REDIRECT_URI, None) {
            config.google_redirect_uri = uri;
        }
        if let Some(raw) = env_var(ENV_REQUEST_TIMEOUT_SECS, None) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                SnacksyError::config(format!(
                    "{} must be a whole number of seconds, got '{}': {}",
                    ENV_REQUEST_TIMEOUT_SECS, raw, e
                ))
            })?;
            config.request_timeout_secs = Some(secs);
        }

        if let Some(url) = &overrides.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(id) = &overrides.google_client_id {
            config.google_client_id = Some(id.clone());
        }
        if let Some(uri) = &overrides.google_redirect_uri {
            config.google_redirect_uri = uri.clone();
        }
        if let Some(level) = &overrides.log_level {
            config.log_level = level.clone();
        }

        config.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_dotenv_status_is_logged_later() {
        let statuses = [
            DotenvStatus::Loaded(PathBuf::from(".env")),
            DotenvStatus::Missing,
            DotenvStatus::Unreadable("line 3: unexpected character".into()),
        ];
        // No subscriber is installed here; logging must still be safe.
        for status in &statuses {
            status.log();
        }
        assert_ne!(statuses[1], statuses[2]);
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config =
            ConfigService::resolve(None, env_from(&[]), &ConfigOverrides::default()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_precedence_file_env_override() {
        let file = ConfigFile {
            api_base_url: Some("http://file:8000".into()),
            google_client_id: Some("file-client".into()),
            log_level: Some("debug".into()),
            ..ConfigFile::default()
        };
        let env = env_from(&[(ENV_API_BASE_URL, "http://env:8000")]);
        let overrides = ConfigOverrides {
            google_client_id: Some("flag-client".into()),
            ..ConfigOverrides::default()
        };

        let config = ConfigService::resolve(Some(file), env, &overrides).unwrap();
        assert_eq!(config.api_base_url, "http://env:8000");
        assert_eq!(config.client_id(), Some("flag-client"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_vite_names_are_fallbacks() {
        let env = env_from(&[
            (ENV_VITE_API_BASE_URL, "http://vite:8000/"),
            (ENV_VITE_GOOGLE_CLIENT_ID, "vite-client"),
        ]);
        let config = ConfigService::resolve(None, env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.api_base_url, "http://vite:8000");
        assert_eq!(config.client_id(), Some("vite-client"));

        let env = env_from(&[
            (ENV_VITE_GOOGLE_CLIENT_ID, "vite-client"),
            (ENV_GOOGLE_CLIENT_ID, "snacksy-client"),
        ]);
        let config = ConfigService::resolve(None, env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.client_id(), Some("snacksy-client"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let file = ConfigFile {
            google_client_id: Some("file-client".into()),
            ..ConfigFile::default()
        };
        let env = env_from(&[(ENV_GOOGLE_CLIENT_ID, "  ")]);
        let config = ConfigService::resolve(Some(file), env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.client_id(), Some("file-client"));
    }

    #[test]
    fn test_bad_timeout_is_config_error() {
        let env = env_from(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]);
        let err = ConfigService::resolve(None, env, &ConfigOverrides::default()).unwrap_err();
        assert!(err.is_config());

        let env = env_from(&[(ENV_REQUEST_TIMEOUT_SECS, "30")]);
        let config = ConfigService::resolve(None, env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(SnacksyPaths::new(Some(temp_dir.path().to_path_buf())));
        assert!(service.load_file().unwrap().is_none());

        let file = ConfigFile {
            api_base_url: Some("https://api.snacksy.dev".into()),
            request_timeout_secs: Some(20),
            ..ConfigFile::default()
        };
        service.save_file(&file).unwrap();
        assert_eq!(service.load_file().unwrap(), Some(file));
    }
}
