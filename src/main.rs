use anyhow::{bail, Result};
use dotenvy::dotenv;

use slapdeck::cli::{Cli, Commands};
use slapdeck::core::{init_logger, Config, DeployEnv};
use slapdeck::{create_bot, server, tunnel, PublicBaseUrl};

/// Main entry point for the bridge
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging,
/// tunnel establishment, webhook registration).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let config = Config::from_env()?;
    init_logger(&config.log_file)?;

    match cli.command {
        Some(Commands::Run) | None => {
            log::info!("Running in {:?} mode", config.env);
            server::run(config).await
        }
        Some(Commands::RegisterWebhook) => register_webhook_once(config).await,
    }
}

/// Register the fixed production endpoint with Telegram and exit.
///
/// Useful on deploys where the webhook target changes without the
/// service restarting behind it.
async fn register_webhook_once(config: Config) -> Result<()> {
    if config.env != DeployEnv::Production {
        bail!("register-webhook requires APP_ENV=production; development registers the tunnel URL on startup");
    }

    let bot = create_bot(&config)?;
    let public = PublicBaseUrl::establish(&config).await?;
    tunnel::register_webhook(&bot, public.url(), &config).await?;
    Ok(())
}
