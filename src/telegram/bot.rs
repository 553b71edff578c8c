//! Bot instance creation and the static game texts

use indoc::indoc;
use reqwest::ClientBuilder;
use teloxide::prelude::*;

use crate::core::config::{self, Config};

/// Rules of the card game, sent in reply to any plain-text message
pub const GAME_RULES: &str = indoc! {"
    Each player is dealt 26 cards.

    Players alternately discard one card from their hand.

    When some of the following combinations occur players race to slap the discard pile:
     * Double (e.g. 2-2)
     * Marriage (e.g. K-Q)
     * Sandwich (e.g. 2-5-2)
     * Divorce (e.g. Q-10-K)
     * Three in a Row (e.g. K-1-2, 3-4-5)

    The player who slaps first takes all the cards from the pile.

    If someone slaps when there is no valid combination, the other player takes all the cards.

    The goal of the game is to have all 52 cards in your hand.
"};

/// Label of the inline button that opens the game web app
pub const PLAY_BUTTON_LABEL: &str = "\u{1F91F}Let's play\u{1F91F}!!!";

/// Creates a Bot instance with custom or default API URL
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Failed to build the underlying HTTP client
pub fn create_bot(config: &Config) -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::request_timeout()).build()?;
    let bot = Bot::with_client(config.bot_token.clone(), client);

    // Local Bot API server support, e.g. for larger uploads or tests
    let bot = if let Some(api_url) = &config.bot_api_url {
        log::info!("Using custom Bot API URL: {}", api_url);
        bot.set_api_url(api_url.clone())
    } else {
        bot
    };

    Ok(bot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_mention_every_combination() {
        for combo in ["Double", "Marriage", "Sandwich", "Divorce", "Three in a Row"] {
            assert!(GAME_RULES.contains(combo), "rules are missing {combo}");
        }
        assert!(GAME_RULES.contains("26 cards"));
        assert!(GAME_RULES.contains("52 cards"));
    }
}
