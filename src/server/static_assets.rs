//! Response headers for the precompressed game bundle
//!
//! The game client ships brotli-compressed WASM files that are requested
//! under their literal `.br` names. `ServeDir` cannot infer an encoding
//! for that extension, so the headers are overridden here.

use axum::extract::Request;
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware declaring `.br` assets as brotli-encoded WASM
pub async fn brotli_wasm_headers(request: Request, next: Next) -> Response {
    let is_brotli = request.uri().path().ends_with(".br");

    let mut response = next.run(request).await;

    if is_brotli && response.status().is_success() {
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("br"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/wasm"));
    }

    response
}
