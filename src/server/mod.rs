//! HTTP surface of the bridge
//!
//! Every route sits behind the shared-secret gate, static game assets
//! included. Telegram presents the secret in its webhook deliveries and
//! the game client mirrors it on its API calls.

use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use teloxide::prelude::*;
use teloxide::types::Update;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::core::config::Config;
use crate::telegram::handlers::{HandlerDeps, HandlerError};
use crate::telegram::{create_bot, schema};
use crate::tunnel::{self, PublicBaseUrl};

pub mod auth;
pub mod invoice;
pub mod payment_webhook;
pub mod static_assets;

pub use invoice::{InvoiceClient, InvoiceRequest};

/// Shared state for all routes
pub struct AppState {
    pub bot: Bot,
    pub schema: teloxide::dispatching::UpdateHandler<HandlerError>,
    pub invoices: InvoiceClient,
    pub secret_token: String,
    pub public_url: url::Url,
}

/// Builds the router: webhook delivery, invoice relay, payment webhook,
/// tunnel status, and the static game bundle as the fallback.
pub fn build_router(state: Arc<AppState>, hook_path: &str, webapp_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route(&format!("/{hook_path}"), post(handle_update))
        .route("/createInvoice", post(invoice::create_invoice))
        .route("/paymentWebhook", post(payment_webhook::handle))
        .route("/currentNgrokUrl", get(current_public_url))
        .fallback_service(ServeDir::new(webapp_dir))
        .layer(middleware::from_fn(static_assets::brotli_wasm_headers))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), auth::require_secret))
        .layer(cors)
        .with_state(state)
}

/// Resolve the public base URL, register the webhook, and serve.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let bot = create_bot(&config)?;

    let public = PublicBaseUrl::establish(&config).await?;
    tunnel::register_webhook(&bot, public.url(), &config).await?;

    let state = Arc::new(AppState {
        bot: bot.clone(),
        schema: schema(HandlerDeps::new(public.url().clone())),
        invoices: InvoiceClient::new(config.bot_api_url.as_ref(), &config.bot_token)?,
        secret_token: config.secret_token.clone(),
        public_url: public.url().clone(),
    });
    let app = build_router(state, &config.hook_path, &config.webapp_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Server running at http://{}/", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Keep the tunnel forwarder alive for as long as we serve
    drop(public);
    Ok(())
}

/// POST /<hook> — Telegram update delivery.
///
/// The delivery is acknowledged 200 no matter what happens inside the
/// handlers; Telegram retries non-2xx responses and the handlers are
/// not idempotent.
async fn handle_update(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    // teloxide's Update deserializer falls back to UpdateKind::Error when
    // driven through serde_json::from_value; decoding from a string works.
    let update: Update = match serde_json::from_str(&payload.to_string()) {
        Ok(update) => update,
        Err(err) => {
            log::warn!("Discarding undecodable update: {}", err);
            return StatusCode::OK;
        }
    };

    match state
        .schema
        .dispatch(dptree::deps![state.bot.clone(), update])
        .await
    {
        ControlFlow::Break(Ok(())) => {}
        ControlFlow::Break(Err(err)) => log::error!("Handler error: {:?}", err),
        ControlFlow::Continue(_) => log::debug!("Update matched no handler branch"),
    }

    StatusCode::OK
}

/// GET /currentNgrokUrl — the public base URL the web-app button points
/// at (the tunnel address in development, the fixed endpoint otherwise).
async fn current_public_url(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "url": state.public_url.as_str() }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => log::error!("Failed to install SIGTERM handler: {}", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    log::info!("Shutdown signal received");
}
