//! Dispatcher schema and handler chain builders
//!
//! The same schema is dispatched for every update delivered to the
//! webhook route, and is reused as-is by the integration tests.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message, WebAppInfo};
use url::Url;

use super::bot::{GAME_RULES, PLAY_BUTTON_LABEL};
use super::payments;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    /// Public URL the web-app button opens (tunnel URL in development,
    /// the fixed endpoint in production)
    pub webapp_url: Url,
}

impl HandlerDeps {
    pub fn new(webapp_url: Url) -> Self {
        Self { webapp_url }
    }
}

/// Creates the dispatcher schema for the bot.
///
/// Only the update kinds the webhook subscribes to are branched here;
/// anything else falls through and is dropped.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Successful payment handler must be first: those messages carry
        // no text and must not fall through to the rules reply
        .branch(successful_payment_handler())
        .branch(pre_checkout_handler())
        .branch(message_handler(deps))
}

/// Handler for successful Telegram payments: log and move on, the
/// game client grants the purchase from its own follow-up
fn successful_payment_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.successful_payment().is_some())
        .endpoint(|msg: Message| async move {
            if let Some(payment) = msg.successful_payment() {
                payments::log_successful_payment(msg.chat.id, payment);
            }
            Ok(())
        })
}

/// Handler for pre-checkout queries (Telegram Stars payments)
fn pre_checkout_handler() -> UpdateHandler<HandlerError> {
    Update::filter_pre_checkout_query().endpoint(
        |bot: Bot, query: teloxide::types::PreCheckoutQuery| async move {
            let outcome = payments::answer_pre_checkout(&bot, &query).await;
            log::info!("Pre-checkout query {} resolved: {:?}", query.id, outcome);
            Ok(())
        },
    )
}

/// Handler for plain-text messages: reply with the game rules and an
/// inline button opening the web app
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                bot.send_message(msg.chat.id, GAME_RULES)
                    .reply_markup(play_keyboard(deps.webapp_url.clone()))
                    .await?;
                Ok(())
            }
        })
}

/// One-button inline keyboard that opens the game web app
fn play_keyboard(url: Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([vec![InlineKeyboardButton::web_app(
        PLAY_BUTTON_LABEL,
        WebAppInfo { url },
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_keyboard_opens_web_app() {
        let url = Url::parse("https://game.example.com").unwrap();
        let keyboard = play_keyboard(url.clone());

        let rows = &keyboard.inline_keyboard;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 1);

        let button = &rows[0][0];
        assert_eq!(button.text, PLAY_BUTTON_LABEL);
        match &button.kind {
            teloxide::types::InlineKeyboardButtonKind::WebApp(info) => {
                assert_eq!(info.url, url);
            }
            other => panic!("expected a web-app button, got {other:?}"),
        }
    }
}
