//! Environment-driven configuration
//!
//! Everything is read once at startup. The shared webhook secret is
//! mandatory: with no secret configured the authenticator would compare
//! against nothing and wave unauthenticated requests through, so startup
//! refuses to continue without one.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Request timeout for outbound Telegram API calls (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outbound request timeout duration
pub fn request_timeout() -> Duration {
    Duration::from_secs(REQUEST_TIMEOUT_SECS)
}

/// Deployment mode, decided once at process start from `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployEnv {
    /// Local development: expose the port through an ngrok tunnel
    Development,
    /// Production: a fixed public endpoint fronts the service
    Production,
}

impl DeployEnv {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(anyhow!(
                "APP_ENV must be \"development\" or \"production\", got {other:?}"
            )),
        }
    }
}

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token (`BOT_TOKEN`)
    pub bot_token: String,
    /// Path segment Telegram delivers updates to (`HOOK_PATH`, default "hook")
    pub hook_path: String,
    /// Shared secret Telegram echoes back in the webhook header (`SECRET_TOKEN`)
    pub secret_token: String,
    /// Deployment mode (`APP_ENV`, default "development")
    pub env: DeployEnv,
    /// ngrok auth token, required in development (`NGROK_AUTHTOKEN`)
    pub ngrok_authtoken: Option<String>,
    /// Local port the HTTP server binds (`PORT`, default 8080)
    pub port: u16,
    /// Fixed public endpoint, required in production (`APP_ENDPOINT`)
    pub app_endpoint: Option<Url>,
    /// Directory holding the compiled game client (`WEBAPP_DIR`, default "webapp")
    pub webapp_dir: PathBuf,
    /// Log file path (`LOG_FILE_PATH`, default "slapdeck.log")
    pub log_file: String,
    /// Optional Bot API base override (`BOT_API_URL`), e.g. a local Bot API server
    pub bot_api_url: Option<Url>,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = get("BOT_TOKEN").ok_or_else(|| anyhow!("BOT_TOKEN is not set"))?;
        let secret_token = get("SECRET_TOKEN").ok_or_else(|| anyhow!("SECRET_TOKEN is not set"))?;
        if secret_token.is_empty() {
            return Err(anyhow!("SECRET_TOKEN must not be empty"));
        }

        let env = DeployEnv::parse(&get("APP_ENV").unwrap_or_else(|| "development".to_string()))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("invalid PORT: {raw:?}"))?,
            None => 8080,
        };

        let app_endpoint = get("APP_ENDPOINT")
            .map(|raw| Url::parse(&raw).with_context(|| format!("invalid APP_ENDPOINT: {raw:?}")))
            .transpose()?;
        if env == DeployEnv::Production && app_endpoint.is_none() {
            return Err(anyhow!("APP_ENDPOINT is required when APP_ENV=production"));
        }

        let ngrok_authtoken = get("NGROK_AUTHTOKEN");
        if env == DeployEnv::Development && ngrok_authtoken.is_none() {
            return Err(anyhow!("NGROK_AUTHTOKEN is required when APP_ENV=development"));
        }

        let bot_api_url = get("BOT_API_URL")
            .map(|raw| Url::parse(&raw).with_context(|| format!("invalid BOT_API_URL: {raw:?}")))
            .transpose()?;

        Ok(Self {
            bot_token,
            hook_path: get("HOOK_PATH").unwrap_or_else(|| "hook".to_string()),
            secret_token,
            env,
            ngrok_authtoken,
            port,
            app_endpoint,
            webapp_dir: PathBuf::from(get("WEBAPP_DIR").unwrap_or_else(|| "webapp".to_string())),
            log_file: get("LOG_FILE_PATH").unwrap_or_else(|| "slapdeck.log".to_string()),
            bot_api_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("BOT_TOKEN", "12345:token"),
            ("SECRET_TOKEN", "s3cret"),
            ("NGROK_AUTHTOKEN", "ng_tok"),
        ])
    }

    fn lookup(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| vars.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(base_vars())).unwrap();
        assert_eq!(config.hook_path, "hook");
        assert_eq!(config.port, 8080);
        assert_eq!(config.env, DeployEnv::Development);
        assert_eq!(config.webapp_dir, PathBuf::from("webapp"));
        assert!(config.bot_api_url.is_none());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let mut vars = base_vars();
        vars.remove("SECRET_TOKEN");
        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(err.to_string().contains("SECRET_TOKEN"));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut vars = base_vars();
        vars.insert("SECRET_TOKEN", "");
        assert!(Config::from_lookup(lookup(vars)).is_err());
    }

    #[test]
    fn test_production_requires_endpoint() {
        let mut vars = base_vars();
        vars.insert("APP_ENV", "production");
        let err = Config::from_lookup(lookup(vars.clone())).unwrap_err();
        assert!(err.to_string().contains("APP_ENDPOINT"));

        vars.insert("APP_ENDPOINT", "https://game.example.com");
        let config = Config::from_lookup(lookup(vars)).unwrap();
        assert_eq!(config.env, DeployEnv::Production);
        assert_eq!(
            config.app_endpoint.unwrap().as_str(),
            "https://game.example.com/"
        );
    }

    #[test]
    fn test_development_requires_ngrok_token() {
        let mut vars = base_vars();
        vars.remove("NGROK_AUTHTOKEN");
        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(err.to_string().contains("NGROK_AUTHTOKEN"));
    }

    #[test]
    fn test_invalid_env_is_rejected() {
        let mut vars = base_vars();
        vars.insert("APP_ENV", "staging");
        assert!(Config::from_lookup(lookup(vars)).is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut vars = base_vars();
        vars.insert("PORT", "eighty");
        assert!(Config::from_lookup(lookup(vars)).is_err());
    }
}
