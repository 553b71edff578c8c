//! Payment webhook: pre-checkout approval and payment logging
//!
//! The delivery is always acknowledged 200. Telegram requires webhook
//! acknowledgement to be independent of business-logic success, and a
//! redelivered update would just repeat the same idempotent answers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use teloxide::types::{Update, UpdateKind};

use crate::telegram::payments;

use super::AppState;

/// POST /paymentWebhook — pre-checkout queries get approved (best-effort
/// decline on failure), successful payments get logged. Anything else is
/// dropped.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    // teloxide's Update deserializer falls back to UpdateKind::Error when
    // driven through serde_json::from_value; decoding from a string works.
    let update: Update = match serde_json::from_str(&payload.to_string()) {
        Ok(update) => update,
        Err(err) => {
            log::warn!("Discarding undecodable payment update: {}", err);
            return StatusCode::OK;
        }
    };

    match update.kind {
        UpdateKind::PreCheckoutQuery(query) => {
            let outcome = payments::answer_pre_checkout(&state.bot, &query).await;
            log::info!("Pre-checkout query {} resolved: {:?}", query.id, outcome);
        }
        UpdateKind::Message(message) => {
            if let Some(payment) = message.successful_payment() {
                payments::log_successful_payment(message.chat.id, payment);
            }
        }
        _ => {}
    }

    StatusCode::OK
}
