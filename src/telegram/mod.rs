//! Telegram bot integration: bot construction, dispatcher schema, payments

pub mod bot;
pub mod handlers;
pub mod payments;

// Re-exports for convenience
pub use bot::{create_bot, GAME_RULES, PLAY_BUTTON_LABEL};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use payments::{answer_pre_checkout, PreCheckoutOutcome};
