use anyhow::{Context, Result};
use snacksy_core::config::AppConfig;
use snacksy_infrastructure::{ConfigFile, ConfigService};

use crate::render;

pub fn show(config: &AppConfig) -> Result<()> {
    let text = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{}", text);
    Ok(())
}

/// Writes the resolved values to `config.toml` so later runs need no flags.
pub fn init(service: &ConfigService, config: &AppConfig) -> Result<()> {
    let file = ConfigFile {
        api_base_url: Some(config.api_base_url.clone()),
        google_client_id: config.client_id().map(str::to_string),
        google_redirect_uri: Some(config.google_redirect_uri.clone()),
        request_timeout_secs: config.request_timeout_secs,
        log_level: Some(config.log_level.clone()),
    };
    service.save_file(&file)?;
    render::info("Configuration written.");
    Ok(())
}
