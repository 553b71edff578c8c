//! Slapdeck - Telegram bot and payments backend for the Slapdeck card game
//!
//! This library contains the whole bridge between Telegram and the
//! browser-based game client:
//!
//! # Module Structure
//!
//! - `core`: configuration and logging setup
//! - `telegram`: bot construction, dispatcher schema, payment helpers
//! - `server`: the HTTP surface (webhook gate, invoice relay, payment
//!   webhook, static game assets)
//! - `tunnel`: public base URL resolution (ngrok in development, a fixed
//!   endpoint in production) and webhook registration

pub mod cli;
pub mod core;
pub mod server;
pub mod telegram;
pub mod tunnel;

// Re-export commonly used types for convenience
pub use crate::core::config::{Config, DeployEnv};
pub use crate::server::{build_router, AppState};
pub use crate::telegram::{create_bot, schema, HandlerDeps, HandlerError};
pub use crate::tunnel::PublicBaseUrl;
