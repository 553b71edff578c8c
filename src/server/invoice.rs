//! Invoice relay for Telegram Stars purchases
//!
//! The game client asks for an invoice; we forward the request as one
//! `sendInvoice` call and hand the API's response body back verbatim.
//! Stars invoices carry the fixed "XTR" currency code and an empty
//! provider token, which tells Telegram to use its built-in payment
//! rail instead of a third-party provider.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::core::config;

use super::AppState;

/// Default Telegram Bot API root
const TELEGRAM_API_ROOT: &str = "https://api.telegram.org";

/// Currency code of Telegram's built-in Stars payment rail
pub const STARS_CURRENCY: &str = "XTR";

/// Invoice request as the game client sends it. Forwarded verbatim, no
/// validation of ranges or amounts; a bad amount is Telegram's call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub chat_id: i64,
    pub title: String,
    pub description: String,
    pub payload: String,
    pub amount: i64,
}

/// `sendInvoice` request body
#[derive(Debug, Serialize)]
struct SendInvoicePayload<'a> {
    chat_id: i64,
    title: &'a str,
    description: &'a str,
    payload: &'a str,
    provider_token: &'a str,
    currency: &'a str,
    prices: [LabeledPrice<'a>; 1],
}

#[derive(Debug, Serialize)]
struct LabeledPrice<'a> {
    label: &'a str,
    amount: i64,
}

impl<'a> SendInvoicePayload<'a> {
    fn for_stars(request: &'a InvoiceRequest) -> Self {
        Self {
            chat_id: request.chat_id,
            title: &request.title,
            description: &request.description,
            payload: &request.payload,
            provider_token: "",
            currency: STARS_CURRENCY,
            prices: [LabeledPrice {
                label: &request.title,
                amount: request.amount,
            }],
        }
    }
}

/// The three ways an invoice call can fail
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// The API answered with an error body
    #[error("Telegram API returned an error response")]
    Api(serde_json::Value),
    /// The call went out but no usable response came back
    #[error("No response from Telegram API")]
    NoResponse,
    /// The request could not even be constructed or sent
    #[error("{0}")]
    Request(String),
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let body = match self {
            InvoiceError::Api(value) => json!({ "error": value }),
            InvoiceError::NoResponse => json!({ "error": "No response from Telegram API" }),
            InvoiceError::Request(message) => json!({ "error": message }),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Thin client for the one outbound `sendInvoice` call
pub struct InvoiceClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl InvoiceClient {
    /// Create a client for the given API root (or the default one)
    pub fn new(api_root: Option<&Url>, bot_token: &str) -> anyhow::Result<Self> {
        let root = match api_root {
            Some(url) => url.as_str().trim_end_matches('/').to_string(),
            None => TELEGRAM_API_ROOT.to_string(),
        };
        let endpoint = Url::parse(&format!("{root}/bot{bot_token}/sendInvoice"))?;

        Ok(Self {
            http: reqwest::Client::builder().timeout(config::request_timeout()).build()?,
            endpoint,
        })
    }

    /// Issues exactly one `sendInvoice` call. No retry, no idempotency key.
    pub async fn send_invoice(&self, request: &InvoiceRequest) -> Result<serde_json::Value, InvoiceError> {
        let body = SendInvoicePayload::for_stars(request);

        let response = match self.http.post(self.endpoint.clone()).json(&body).send().await {
            Ok(response) => response,
            Err(err) if err.is_builder() => {
                log::error!("Error in request setup: {}", err);
                return Err(InvoiceError::Request(err.to_string()));
            }
            Err(err) => {
                log::error!("No response received: {}", err);
                return Err(InvoiceError::NoResponse);
            }
        };

        let status = response.status();
        let value: serde_json::Value = match response.json().await {
            Ok(value) => value,
            Err(err) => {
                log::error!("Unreadable response from Telegram API: {}", err);
                return Err(InvoiceError::NoResponse);
            }
        };

        if status.is_success() {
            Ok(value)
        } else {
            log::error!("Error creating invoice: {}", value);
            Err(InvoiceError::Api(value))
        }
    }
}

/// POST /createInvoice — relay an invoice request to Telegram and echo
/// the API's response body back to the game client.
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InvoiceRequest>,
) -> Result<Json<serde_json::Value>, InvoiceError> {
    let body = state.invoices.send_invoice(&request).await?;
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> InvoiceRequest {
        InvoiceRequest {
            chat_id: 1,
            title: "t".to_string(),
            description: "d".to_string(),
            payload: "p".to_string(),
            amount: 100,
        }
    }

    #[test]
    fn test_stars_payload_shape() {
        let request = request();
        let value = serde_json::to_value(SendInvoicePayload::for_stars(&request)).unwrap();

        assert_eq!(value["currency"], "XTR");
        assert_eq!(value["provider_token"], "");
        assert_eq!(value["prices"], serde_json::json!([{ "label": "t", "amount": 100 }]));
        assert_eq!(value["chat_id"], 1);
        assert_eq!(value["description"], "d");
        assert_eq!(value["payload"], "p");
    }

    #[test]
    fn test_negative_amount_is_forwarded_untouched() {
        let mut request = request();
        request.amount = -5;
        let value = serde_json::to_value(SendInvoicePayload::for_stars(&request)).unwrap();
        assert_eq!(value["prices"][0]["amount"], -5);
    }

    #[test]
    fn test_endpoint_construction() {
        let client = InvoiceClient::new(None, "12345:abc").unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://api.telegram.org/bot12345:abc/sendInvoice"
        );

        let local = Url::parse("http://localhost:8081/").unwrap();
        let client = InvoiceClient::new(Some(&local), "12345:abc").unwrap();
        assert_eq!(client.endpoint.as_str(), "http://localhost:8081/bot12345:abc/sendInvoice");
    }

    #[test]
    fn test_error_bodies() {
        let api = InvoiceError::Api(serde_json::json!({ "ok": false }));
        let no_response = InvoiceError::NoResponse;
        let setup = InvoiceError::Request("bad url".to_string());

        assert_eq!(api.to_string(), "Telegram API returned an error response");
        assert_eq!(no_response.to_string(), "No response from Telegram API");
        assert_eq!(setup.to_string(), "bad url");
    }
}
