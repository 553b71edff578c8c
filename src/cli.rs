use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slapdeck")]
#[command(author, version, about = "Telegram bot and payments backend for the Slapdeck card game", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server (tunnels through ngrok in development)
    Run,

    /// Register the production webhook endpoint with Telegram and exit
    RegisterWebhook,
}

impl Cli {
    /// Parse CLI arguments from the command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["slapdeck"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_register_webhook_subcommand() {
        let cli = Cli::parse_from(["slapdeck", "register-webhook"]);
        assert!(matches!(cli.command, Some(Commands::RegisterWebhook)));
    }
}
