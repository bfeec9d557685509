use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use snacksy_infrastructure::{ConfigOverrides, ConfigService, SnacksyPaths};

mod bootstrap;
mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "snacksy")]
#[command(about = "Snacksy - turn a food photo into YouTube recommendations", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the Snacksy backend
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Google OAuth client id
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Redirect URI registered for the OAuth client
    #[arg(long, global = true)]
    redirect_uri: Option<String>,

    /// Directory for config, stored session and logs (defaults to the
    /// platform config/data directories)
    #[arg(long, global = true, env = "SNACKSY_HOME")]
    data_dir: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `snacksy_application=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (default)
    Shell,
    /// Show the signed-in user and configuration
    Status,
    /// Sign in with Google
    Signin,
    /// Sign out and forget the stored session
    Signout,
    /// Upload a food photo and print the detected tags
    Tag {
        /// Image file to analyze
        path: PathBuf,
    },
    /// Inspect or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Write the resolved configuration to config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = SnacksyPaths::new(cli.data_dir.clone());
    let overrides = ConfigOverrides {
        api_base_url: cli.api_base_url.clone(),
        google_client_id: cli.client_id.clone(),
        google_redirect_uri: cli.redirect_uri.clone(),
        log_level: cli.log_level.clone(),
    };

    let dotenv = ConfigService::load_dotenv();
    let config_service = ConfigService::new(paths.clone());
    let config = config_service.load(&overrides)?;

    let _log_guard = logging::init(&config, &paths)?;
    dotenv.log();
    tracing::info!(
        "[Snacksy] Starting (api_base_url={}, version={})",
        config.api_base_url,
        env!("CARGO_PKG_VERSION")
    );

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let app = bootstrap::build(&config, &paths)?;
            commands::shell::run(app).await?
        }
        Commands::Status => {
            let app = bootstrap::build(&config, &paths)?;
            commands::oneshot::status(&app, &config).await
        }
        Commands::Signin => {
            let app = bootstrap::build(&config, &paths)?;
            commands::oneshot::sign_in(&app).await?
        }
        Commands::Signout => {
            let app = bootstrap::build(&config, &paths)?;
            commands::oneshot::sign_out(&app).await
        }
        Commands::Tag { path } => {
            let app = bootstrap::build(&config, &paths)?;
            commands::oneshot::tag(&app, &path).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config)?,
            ConfigAction::Init => commands::config::init(&config_service, &config)?,
        },
    }

    Ok(())
}
