//! Public base URL resolution and webhook registration
//!
//! Development and production share one registration path; the only
//! difference is where the public base URL comes from. In development an
//! ngrok tunnel is opened to the local port and its address is used; in
//! production the configured endpoint is taken as-is.

use anyhow::{anyhow, Result};
use ngrok::config::ForwarderBuilder;
use ngrok::forwarder::Forwarder;
use ngrok::prelude::*;
use ngrok::tunnel::HttpTunnel;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use url::Url;

use crate::core::config::{Config, DeployEnv};

/// Where the public traffic enters, resolved once at startup.
///
/// The tunnel variant owns the ngrok forwarder; dropping it closes the
/// tunnel, so the value must stay alive for the lifetime of the server.
pub enum PublicBaseUrl {
    Tunnel {
        url: Url,
        _forwarder: Forwarder<HttpTunnel>,
    },
    Fixed(Url),
}

impl PublicBaseUrl {
    /// Resolve the public base URL for the configured deployment mode
    pub async fn establish(config: &Config) -> Result<Self> {
        match config.env {
            DeployEnv::Development => {
                let authtoken = config
                    .ngrok_authtoken
                    .as_deref()
                    .ok_or_else(|| anyhow!("NGROK_AUTHTOKEN is not set"))?;

                let session = ngrok::Session::builder().authtoken(authtoken).connect().await?;
                let local = Url::parse(&format!("http://localhost:{}", config.port))?;
                let forwarder = session.http_endpoint().listen_and_forward(local).await?;

                let url = Url::parse(forwarder.url())?;
                log::info!("ngrok tunnel established at {}", url);

                Ok(Self::Tunnel {
                    url,
                    _forwarder: forwarder,
                })
            }
            DeployEnv::Production => {
                let url = config
                    .app_endpoint
                    .clone()
                    .ok_or_else(|| anyhow!("APP_ENDPOINT is not set"))?;
                Ok(Self::Fixed(url))
            }
        }
    }

    /// The resolved public base URL
    pub fn url(&self) -> &Url {
        match self {
            Self::Tunnel { url, .. } => url,
            Self::Fixed(url) => url,
        }
    }
}

/// Registers the webhook target with Telegram: hook URL, shared secret,
/// and the update kinds the dispatcher subscribes to.
///
/// Successful payments have no `allowed_updates` kind of their own; they
/// arrive inside `message` updates.
pub async fn register_webhook(bot: &Bot, base: &Url, config: &Config) -> Result<()> {
    let hook_url = join_hook(base, &config.hook_path)?;

    bot.set_webhook(hook_url.clone())
        .secret_token(config.secret_token.clone())
        .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::PreCheckoutQuery])
        .await?;

    log::info!("Webhook registered at {}", hook_url);
    Ok(())
}

fn join_hook(base: &Url, hook_path: &str) -> Result<Url> {
    let base = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/{hook_path}"))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_hook_handles_trailing_slash() {
        let base = Url::parse("https://abc123.ngrok.app/").unwrap();
        assert_eq!(join_hook(&base, "hook").unwrap().as_str(), "https://abc123.ngrok.app/hook");

        let base = Url::parse("https://game.example.com").unwrap();
        assert_eq!(
            join_hook(&base, "tg-hook").unwrap().as_str(),
            "https://game.example.com/tg-hook"
        );
    }

    #[test]
    fn test_fixed_base_url() {
        let url = Url::parse("https://game.example.com").unwrap();
        let public = PublicBaseUrl::Fixed(url.clone());
        assert_eq!(public.url(), &url);
    }
}
