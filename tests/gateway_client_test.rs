//! Gateway client behavior against a mock backend.
//!
//! Covers both envelope conventions, token injection, base address
//! switching and the one-notification-per-failure rule.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use console_core::client::{GatewayClient, Method, RequestOptions};
use console_core::config::{AuthScheme, GatewayConfig};
use console_core::defaults::messages;
use console_core::envelope::{CodeEnvelope, SuccessFlagEnvelope};
use console_core::error::{ErrorKind, GatewayError};
use console_core::interceptor::{GatewayInterceptor, RequestContext};
use console_core::notify::{NotificationLevel, RecordingNotifier};
use console_core::storage::{KeyValueStore, MemoryStore};
use console_core::transport::TransportRequest;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    client: GatewayClient,
    notifier: Arc<RecordingNotifier>,
    store: Arc<MemoryStore>,
}

fn code_client(base: &str) -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(MemoryStore::new());
    let client = GatewayClient::builder()
        .base_address(base)
        .envelope(CodeEnvelope::default())
        .token_store(store.clone())
        .notifier(notifier.clone())
        .build()
        .expect("client should build");
    Harness {
        client,
        notifier,
        store,
    }
}

fn flag_client(base: &str) -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(MemoryStore::new());
    let client = GatewayClient::builder()
        .base_address(base)
        .envelope(SuccessFlagEnvelope::default())
        .token_store(store.clone())
        .notifier(notifier.clone())
        .build()
        .expect("client should build");
    Harness {
        client,
        notifier,
        store,
    }
}

#[tokio::test]
async fn code_envelope_success_yields_only_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/currencies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{"id": 1, "symbol": "USDT"}],
            "message": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = code_client(&format!("{}/api", server.uri()));
    let data = h
        .client
        .get("/currencies", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 1, "symbol": "USDT"}]));
    assert!(h.notifier.notifications().is_empty());
}

#[tokio::test]
async fn success_flag_envelope_success_yields_only_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/work-orders/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 42, "status": "open"},
            "message": null
        })))
        .mount(&server)
        .await;

    let h = flag_client(&server.uri());
    let data = h
        .client
        .get("work-orders/42", RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(data, json!({"id": 42, "status": "open"}));
}

#[tokio::test]
async fn stored_token_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    h.store.set("token", "tok-123").unwrap();
    let data = h.client.get("/me", RequestOptions::default()).await.unwrap();
    assert_eq!(data, json!("ok"));
}

#[tokio::test]
async fn token_is_read_at_dispatch_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    h.client.get("/me", RequestOptions::default()).await.unwrap();
    h.store.set("token", "after-login").unwrap();
    h.client.get("/me", RequestOptions::default()).await.unwrap();
    h.store.remove("token").unwrap();
    h.client.get("/me", RequestOptions::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[1].headers.get("authorization").unwrap(),
        "after-login"
    );
    assert!(requests[2].headers.get("authorization").is_none());
}

#[tokio::test]
async fn bearer_scheme_and_default_headers_are_applied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer abc"))
        .and(header("x-console", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = GatewayConfig::builder()
        .base_address(server.uri())
        .auth_scheme(AuthScheme::Bearer)
        .header("X-Console", "product")
        .build();
    let client = GatewayClient::builder()
        .config(config)
        .token_store(Arc::new(MemoryStore::with_entry("token", "abc")))
        .notifier(Arc::new(RecordingNotifier::new()))
        .build()
        .unwrap();

    assert_eq!(
        client.get("/me", RequestOptions::default()).await.unwrap(),
        json!(1)
    );
}

#[tokio::test]
async fn set_base_address_redirects_later_requests() {
    let old = MockServer::start().await;
    let new = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "old"})))
        .expect(0)
        .mount(&old)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": "new"})))
        .expect(1)
        .mount(&new)
        .await;

    let h = code_client(&old.uri());
    h.client.set_base_address(&new.uri()).unwrap();

    assert_eq!(h.client.base_address().as_str().trim_end_matches('/'), new.uri());
    let data = h
        .client
        .get("/health", RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(data, json!("new"));

    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].text, messages::BASE_ADDRESS_UPDATED);
}

#[tokio::test]
async fn malformed_base_address_is_rejected_locally() {
    let h = code_client("https://admin.example.com/api");
    for bad in ["", "admin.example.com", "ftp://x.example.com", "http://"] {
        let err = h.client.set_base_address(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            h.client.base_address().as_str(),
            "https://admin.example.com/api"
        );
    }
    assert_eq!(h.notifier.count(NotificationLevel::Error), 4);
    assert_eq!(h.notifier.count(NotificationLevel::Success), 0);
}

#[tokio::test]
async fn code_302_is_session_expired_with_one_warning() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 302,
            "message": "token expired"
        })))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let err = h
        .client
        .get("/wallets", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SessionExpired);
    assert_eq!(err.code(), Some(302));
    assert_eq!(err.message(), "token expired");
    assert_eq!(h.notifier.notifications().len(), 1);
    assert_eq!(h.notifier.count(NotificationLevel::Warning), 1);
    assert_eq!(h.notifier.last().unwrap().text, messages::SESSION_EXPIRED);
}

#[tokio::test]
async fn http_401_is_session_expired_for_success_flag_backends() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let h = flag_client(&server.uri());
    let err = h
        .client
        .post("/express-companies", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(err.code(), Some(401));
    assert_eq!(h.notifier.notifications().len(), 1);
    assert_eq!(h.notifier.count(NotificationLevel::Warning), 1);
}

#[tokio::test]
async fn application_failure_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "message": "Wallet is frozen"
        })))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let err = h
        .client
        .put("/wallets/9", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Application {
            message: "Wallet is frozen".into(),
            code: Some(500)
        }
    );
    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].text, "Wallet is frozen");
}

#[tokio::test]
async fn application_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let h = flag_client(&server.uri());
    let err = h
        .client
        .delete("/currencies/3", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.message(), messages::SERVER_ERROR);
    assert_eq!(h.notifier.last().unwrap().text, messages::SERVER_ERROR);
}

#[tokio::test]
async fn error_status_with_envelope_uses_envelope_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 50012,
            "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let err = h
        .client
        .get("/wallets", RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), "database unavailable");
    assert_eq!(err.code(), Some(50012));
}

#[tokio::test]
async fn error_status_without_envelope_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let err = h
        .client
        .get("/wallets", RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Application);
    assert_eq!(err.code(), Some(502));
    assert_eq!(err.message(), "Request failed with status 502");
}

#[tokio::test]
async fn unreadable_success_body_is_an_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let err = h
        .client
        .get("/wallets", RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.message(), messages::MALFORMED_RESPONSE);
    assert_eq!(err.code(), Some(200));
    assert_eq!(h.notifier.notifications().len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error_with_one_notification() {
    let notifier = Arc::new(RecordingNotifier::new());
    let config = GatewayConfig::builder()
        .base_address("http://127.0.0.1:1")
        .connect_timeout(Some(Duration::from_secs(2)))
        .timeout(Some(Duration::from_secs(5)))
        .build();
    let client = GatewayClient::builder()
        .config(config)
        .notifier(notifier.clone())
        .build()
        .unwrap();

    let err = client
        .get("/wallets", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    let notes = notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].text, messages::REQUEST_FAILED);
}

#[tokio::test]
async fn query_and_json_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wallets"))
        .and(query_param("tenant", "7"))
        .and(body_json(json!({"name": "Hot wallet", "currency": "USDT"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": {"id": 99}})))
        .expect(1)
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let options = RequestOptions::new()
        .query("tenant", 7)
        .body(json!({"name": "Hot wallet", "currency": "USDT"}));
    let data = h.client.post("/wallets", options).await.unwrap();
    assert_eq!(data["id"], 99);
}

#[derive(Debug, Deserialize, PartialEq)]
struct Wallet {
    id: u64,
    name: String,
}

#[tokio::test]
async fn typed_requests_decode_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wallets/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"id": 1, "name": "Cold"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wallets/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"id": "two"}
        })))
        .mount(&server)
        .await;

    let h = code_client(&server.uri());
    let wallet: Wallet = h
        .client
        .request_as(Method::GET, "/wallets/1", RequestOptions::default())
        .await
        .unwrap();
    assert_eq!(
        wallet,
        Wallet {
            id: 1,
            name: "Cold".into()
        }
    );

    let err = h
        .client
        .request_as::<Wallet>(Method::GET, "/wallets/2", RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parsing);
    assert_eq!(h.notifier.notifications().len(), 1);
}

#[derive(Default)]
struct TaggingInterceptor {
    errors: AtomicUsize,
}

impl GatewayInterceptor for TaggingInterceptor {
    fn on_before_send(
        &self,
        ctx: &RequestContext,
        mut request: TransportRequest,
    ) -> Result<TransportRequest, GatewayError> {
        request.headers.insert(
            "x-request-id",
            ctx.request_id.to_string().parse().unwrap(),
        );
        Ok(request)
    }

    fn on_error(&self, _ctx: &RequestContext, _error: &GatewayError) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn interceptors_see_requests_and_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": 1})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 400, "message": "nope"})))
        .mount(&server)
        .await;

    let interceptor = Arc::new(TaggingInterceptor::default());
    let client = GatewayClient::builder()
        .base_address(server.uri())
        .notifier(Arc::new(RecordingNotifier::new()))
        .interceptor(interceptor.clone())
        .build()
        .unwrap();

    client.get("/ok", RequestOptions::default()).await.unwrap();
    client.get("/fail", RequestOptions::default()).await.unwrap_err();

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.headers.get("x-request-id").is_some()));
    assert_eq!(interceptor.errors.load(Ordering::SeqCst), 1);
}

async fn cookie_after_login(with_credentials: bool) -> Option<String> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "SESSION=abc; Path=/")
                .set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": 1})))
        .mount(&server)
        .await;

    let config = GatewayConfig::builder()
        .base_address(server.uri())
        .with_credentials(with_credentials)
        .build();
    let client = GatewayClient::builder()
        .config(config)
        .notifier(Arc::new(RecordingNotifier::new()))
        .build()
        .unwrap();

    client.post("/login", RequestOptions::default()).await.unwrap();
    client.get("/me", RequestOptions::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    requests[1]
        .headers
        .get("cookie")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn credentials_mode_replays_session_cookie() {
    assert_eq!(cookie_after_login(true).await.as_deref(), Some("SESSION=abc"));
}

#[tokio::test]
async fn session_cookie_is_dropped_without_credentials_mode() {
    assert_eq!(cookie_after_login(false).await, None);
}
