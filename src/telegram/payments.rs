//! Pre-checkout approval and successful-payment logging
//!
//! Telegram gives a bot 10 seconds to confirm a pre-checkout query or
//! the payment fails on the user's side. We carry no business state, so
//! every query is approved; a decline is only attempted when the
//! approval call itself did not go through.

use teloxide::prelude::*;
use teloxide::types::{ChatId, PreCheckoutQuery, SuccessfulPayment};

/// Reason shown to the user when a payment cannot be approved
pub const DECLINE_REASON: &str = "Unable to process your payment at this time.";

/// Result of answering a pre-checkout query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreCheckoutOutcome {
    /// The approval call succeeded
    Approved,
    /// The approval call failed; the follow-up decline went through
    Declined,
    /// Both the approval and the decline calls failed
    TransportFailed,
}

/// Answers a pre-checkout query, approving it unconditionally.
///
/// If the approval call fails, one decline attempt follows with a fixed
/// human-readable reason so the user is not left waiting on a payment
/// that will never confirm.
pub async fn answer_pre_checkout(bot: &Bot, query: &PreCheckoutQuery) -> PreCheckoutOutcome {
    log::info!(
        "Received pre_checkout_query: id={}, payload={}",
        query.id,
        query.invoice_payload
    );

    match bot.answer_pre_checkout_query(query.id.clone(), true).await {
        Ok(_) => PreCheckoutOutcome::Approved,
        Err(approve_err) => {
            log::error!("Failed to answer pre_checkout_query: {:?}", approve_err);

            match bot
                .answer_pre_checkout_query(query.id.clone(), false)
                .error_message(DECLINE_REASON)
                .await
            {
                Ok(_) => PreCheckoutOutcome::Declined,
                Err(decline_err) => {
                    log::error!("Failed to decline pre_checkout_query: {:?}", decline_err);
                    PreCheckoutOutcome::TransportFailed
                }
            }
        }
    }
}

/// Logs a successful payment. No state is mutated; duplicate webhook
/// deliveries log the same charge twice.
pub fn log_successful_payment(chat_id: ChatId, payment: &SuccessfulPayment) {
    log::info!(
        "Payment received: chat_id={}, payload={}, payment={:?}",
        chat_id,
        payment.invoice_payload,
        payment
    );
}
