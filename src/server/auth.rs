//! Shared-secret webhook gate
//!
//! Telegram echoes the secret registered with `setWebhook` in the
//! `X-Telegram-Bot-Api-Secret-Token` header of every delivery. Any
//! request that does not present the same value is turned away with a
//! 301 before its body is read.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::AppState;

/// Header Telegram uses to echo the webhook secret
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Middleware gating every route on the shared secret
pub async fn require_secret(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request.headers().get(SECRET_HEADER).map(|value| value.as_bytes());
    if presented != Some(state.secret_token.as_bytes()) {
        return StatusCode::MOVED_PERMANENTLY.into_response();
    }

    next.run(request).await
}
