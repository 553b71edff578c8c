use teloxide::prelude::*;
use url::Url;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::method;

#[tokio::test]
async fn debug_bot_request_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "ok": true, "result": true }),
        ))
        .mount(&mock_server)
        .await;

    let api_url: Url = mock_server.uri().parse().unwrap();
    let bot = Bot::new("12345:testtoken").set_api_url(api_url);
    let _ = bot
        .answer_pre_checkout_query(teloxide::types::PreCheckoutQueryId("q-1".to_string()), true)
        .await;
    let _ = bot.send_message(teloxide::types::ChatId(7), "hi").await;

    for req in mock_server.received_requests().await.unwrap_or_default() {
        eprintln!("REQ {} {}", req.method, req.url);
        eprintln!("  body: {}", String::from_utf8_lossy(&req.body));
    }
    panic!("show output");
}
