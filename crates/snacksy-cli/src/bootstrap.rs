//! Wires the concrete adapters into a [`SnacksyApp`].

use std::sync::Arc;

use anyhow::Result;
use snacksy_application::SnacksyApp;
use snacksy_core::config::AppConfig;
use snacksy_core::user::SessionStore;
use snacksy_infrastructure::{FileLocalStorage, SnacksyPaths};
use snacksy_interaction::{ConsoleIdentityProvider, HttpBackend, SessionCookies};

pub fn build(config: &AppConfig, paths: &SnacksyPaths) -> Result<Arc<SnacksyApp>> {
    let storage = Arc::new(FileLocalStorage::open(paths)?);
    let cookies = Arc::new(SessionCookies::persistent(
        &config.api_base_url,
        paths.cookie_file()?,
    )?);
    let backend = Arc::new(HttpBackend::new(config, cookies)?);
    let provider = Arc::new(ConsoleIdentityProvider::stdio());

    tracing::debug!("[Bootstrap] Backend at {}", backend.base_url());

    Ok(Arc::new(SnacksyApp::new(
        config,
        backend,
        provider,
        SessionStore::new(storage),
    )))
}
