//! End-to-end tests: real router on a loopback port, Send API mocked.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;

use {
    bistro_auto_reply::Composer,
    bistro_config::{BistroConfig, MissingSignaturePolicy, RepliesConfig},
    bistro_gateway::{AppState, build_app},
    bistro_messenger::{Button, OutboundMessage, signature::sign},
    mockito::{Matcher, Mock, ServerGuard},
    secrecy::Secret,
    serde_json::json,
    tempfile::TempDir,
    tokio::net::TcpListener,
};

const APP_SECRET: &str = "test-app-secret";
const VERIFY_TOKEN: &str = "test-verify-token";

struct TestBot {
    addr: SocketAddr,
    state: AppState,
    graph: ServerGuard,
    _assets: TempDir,
}

impl TestBot {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn post_signed(&self, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url("/webhook"))
            .header("content-type", "application/json")
            .header("X-Hub-Signature", sign(body.as_bytes(), APP_SECRET))
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    /// A Send API mock that expects `hits` calls.
    async fn expect_sends(&mut self, hits: usize) -> Mock {
        self.graph
            .mock("POST", "/me/messages")
            .match_query(Matcher::UrlEncoded(
                "access_token".into(),
                "test-page-token".into(),
            ))
            .with_status(200)
            .with_body(r#"{"recipient_id": "user-1", "message_id": "mid.out"}"#)
            .expect(hits)
            .create_async()
            .await
    }
}

async fn start_bot(policy: MissingSignaturePolicy) -> TestBot {
    let graph = mockito::Server::new_async().await;

    let assets = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(assets.path().join("img")).unwrap();
    std::fs::write(assets.path().join("img/logo.jpg"), b"not really a jpeg").unwrap();
    std::fs::write(
        assets.path().join("menu.html"),
        include_str!("../../../public/menu.html"),
    )
    .unwrap();

    let mut config = BistroConfig::default();
    config.server.server_url = "https://bistro.example.com".into();
    config.server.assets_dir = assets.path().display().to_string();
    config.server.max_body_bytes = 64 * 1024;
    config.messenger.app_secret = Secret::new(APP_SECRET.into());
    config.messenger.verify_token = Secret::new(VERIFY_TOKEN.into());
    config.messenger.page_access_token = Secret::new("test-page-token".into());
    config.messenger.graph_api_url = graph.url();
    config.messenger.missing_signature = policy;

    let state = AppState::from_config(config).unwrap();
    let app = build_app(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBot {
        addr,
        state,
        graph,
        _assets: assets,
    }
}

fn text_envelope(text: &str) -> String {
    json!({
        "object": "page",
        "entry": [{
            "id": "page-1",
            "time": 1_458_692_752_478_i64,
            "messaging": [{
                "sender": {"id": "user-1"},
                "recipient": {"id": "page-1"},
                "timestamp": 1_458_692_752_478_i64,
                "message": {"mid": "mid.in", "seq": 73, "text": text}
            }]
        }]
    })
    .to_string()
}

// ── Verification handshake ───────────────────────────────────────────────────

#[tokio::test]
async fn verification_echoes_challenge() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url(&format!(
        "/webhook?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=1158201444"
    )))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "1158201444");
}

#[tokio::test]
async fn verification_rejects_bad_token_or_mode() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    for query in [
        "hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=1",
        &format!("hub.mode=unsubscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=1"),
        "hub.challenge=1",
    ] {
        let resp = reqwest::get(bot.url(&format!("/webhook?{query}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), 403, "{query}");
        assert!(resp.text().await.unwrap().is_empty());
    }
}

// ── Event delivery ───────────────────────────────────────────────────────────

#[tokio::test]
async fn menu_message_sends_main_menu() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot
        .graph
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "recipient": {"id": "user-1"},
            "message": {"attachment": {"type": "template", "payload": {"template_type": "generic"}}}
        })))
        .with_status(200)
        .with_body(r#"{"recipient_id": "user-1", "message_id": "mid.out"}"#)
        .expect(1)
        .create_async()
        .await;

    let resp = bot.post_signed(&text_envelope("MENU")).await;
    assert_eq!(resp.status(), 200);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn non_page_object_is_acknowledged_without_sends() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot.expect_sends(0).await;

    let body = text_envelope("menu").replace(r#""object":"page""#, r#""object":"user""#);
    assert!(body.contains(r#""object":"user""#));
    let resp = bot.post_signed(&body).await;
    assert_eq!(resp.status(), 200);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn echo_is_acknowledged_without_sends() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot.expect_sends(0).await;

    let body = json!({
        "object": "page",
        "entry": [{"id": "page-1", "time": 1, "messaging": [{
            "sender": {"id": "page-1"},
            "recipient": {"id": "user-1"},
            "timestamp": 1,
            "message": {"is_echo": true, "app_id": 1_517_776_481_860_111_u64, "mid": "mid.echo", "text": "menu"}
        }]}]
    })
    .to_string();
    assert_eq!(bot.post_signed(&body).await.status(), 200);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn failing_send_api_still_acknowledges() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot
        .graph
        .mock("POST", "/me/messages")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error": {"message": "Invalid OAuth access token.", "code": 190}}"#)
        .expect(1)
        .create_async()
        .await;

    assert_eq!(bot.post_signed(&text_envelope("party")).await.status(), 200);
    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn invalid_json_is_acknowledged() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot.expect_sends(0).await;

    let resp = bot.post_signed("{not json").await;
    assert_eq!(resp.status(), 200);
    mock.assert_async().await;
}

// ── Signature policy ─────────────────────────────────────────────────────────

#[tokio::test]
async fn signature_mismatch_is_forbidden() {
    let mut bot = start_bot(MissingSignaturePolicy::default()).await;
    let mock = bot.expect_sends(0).await;

    let body = text_envelope("menu");
    let resp = reqwest::Client::new()
        .post(bot.url("/webhook"))
        .header("content-type", "application/json")
        .header("X-Hub-Signature", sign(body.as_bytes(), "some-other-secret"))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn tampered_body_is_forbidden() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let body = text_envelope("menu");
    let signature = sign(body.as_bytes(), APP_SECRET);
    let resp = reqwest::Client::new()
        .post(bot.url("/webhook"))
        .header("X-Hub-Signature", signature)
        .body(body.replace("menu", "party"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn unsigned_request_is_processed_by_default() {
    let mut bot = start_bot(MissingSignaturePolicy::AllowAndLog).await;
    let mock = bot.expect_sends(1).await;

    let resp = reqwest::Client::new()
        .post(bot.url("/webhook"))
        .header("content-type", "application/json")
        .body(text_envelope("menu"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn unsigned_request_is_forbidden_under_reject_policy() {
    let mut bot = start_bot(MissingSignaturePolicy::Reject).await;
    let mock = bot.expect_sends(0).await;

    let resp = reqwest::Client::new()
        .post(bot.url("/webhook"))
        .body(text_envelope("menu"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    bot.state.outbox().drain().await;
    mock.assert_async().await;
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let body = "x".repeat(128 * 1024);
    let resp = reqwest::Client::new()
        .post(bot.url("/webhook"))
        .header("X-Hub-Signature", sign(body.as_bytes(), APP_SECRET))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 413);
}

// ── Account linking, assets, health ──────────────────────────────────────────

#[tokio::test]
async fn authorize_renders_success_link() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url(
        "/authorize?account_linking_token=ALT123&redirect_uri=https%3A%2F%2Fexample.com%2Flink",
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("ALT123"));
    assert!(html.contains("authorization_code=1234567890"));
    assert!(html.contains("Bistro Lumiere"));
}

#[tokio::test]
async fn authorize_without_redirect_is_bad_request() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url("/authorize?account_linking_token=ALT123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn authorize_refuses_script_redirect() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url(
        "/authorize?account_linking_token=ALT123&redirect_uri=javascript%3Aalert(document.cookie)",
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(!resp.text().await.unwrap().contains("javascript:"));
}

#[tokio::test]
async fn main_menu_links_resolve() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let composer = Composer::new(&bot.url(""), &RepliesConfig::default());
    let OutboundMessage::GenericTemplate { elements } = composer.main_menu() else {
        panic!("main menu must be a generic template");
    };

    for element in elements {
        let Some(Button::WebUrl { url, .. }) = element.buttons.first() else {
            panic!("{} has no web menu link", element.title);
        };
        let resp = reqwest::get(url.as_str()).await.unwrap();
        assert_eq!(resp.status(), 200, "{url}");
        let (_, anchor) = url.split_once('#').unwrap();
        assert!(
            resp.text().await.unwrap().contains(&format!("id=\"{anchor}\"")),
            "{url}"
        );
    }
}

#[tokio::test]
async fn serves_static_assets() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url("/img/logo.jpg")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "not really a jpeg");

    let missing = reqwest::get(bot.url("/img/nope.jpg")).await.unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn health_reports_ok() {
    let bot = start_bot(MissingSignaturePolicy::default()).await;
    let resp = reqwest::get(bot.url("/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["pending_replies"], 0);
}
