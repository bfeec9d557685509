//! Non-interactive subcommands.

use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;
use snacksy_application::SnacksyApp;
use snacksy_core::config::AppConfig;
use snacksy_infrastructure::load_image;

use crate::render;

pub async fn status(app: &SnacksyApp, config: &AppConfig) {
    let snapshot = app.snapshot().await;
    render::header();
    render::session(&snapshot);
    println!("Backend: {}", config.api_base_url);
}

pub async fn sign_in(app: &SnacksyApp) -> Result<()> {
    match app.sign_in().await {
        Ok(user) => {
            println!("{}", format!("Welcome, {}!", user.display_name()).bright_green());
            Ok(())
        }
        Err(err) => bail!("Authentication Error: {}", err),
    }
}

pub async fn sign_out(app: &SnacksyApp) {
    app.sign_out().await;
    render::info("Signed out.");
}

pub async fn tag(app: &SnacksyApp, path: &Path) -> Result<()> {
    let image = load_image(path).await?;
    app.select_file(image).await;

    let result = app.upload().await;
    render::tagging(&app.snapshot().await);
    match result {
        Ok(_) => Ok(()),
        Err(err) => bail!(render::error_line(&err)),
    }
}
