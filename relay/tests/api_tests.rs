use std::sync::Arc;
use async_trait::async_trait;
use pushrelay::{build_router, ErrorResponse, SaveTokenResponse, SendNotificationResponse};
use pushrelay_delivery::provider::mock::MockProvider;
use pushrelay_delivery::{
    AddressRegistry, DeliveryConfig, Identity, MemoryRegistry, Namespace, Orchestrator,
    PushAddress, RegistryError, RegistryResult,
};
use serde_json::json;

/// Spin up the HTTP server on an OS-assigned port, returning the base URL.
async fn spawn_server(orchestrator: Orchestrator) -> String {
    let app = build_router(Arc::new(orchestrator));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_test_server() -> (String, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::new());
    let orchestrator = Orchestrator::new(
        Arc::new(MemoryRegistry::new()),
        provider.clone(),
        DeliveryConfig::default(),
    );
    (spawn_server(orchestrator).await, provider)
}

async fn save_token(base: &str, user_id: &str, token: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/save-push-token", base))
        .json(&json!({"token": token, "userId": user_id}))
        .send()
        .await
        .unwrap()
}

async fn send(base: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/api/send-notification", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

/// Registry whose backend is always down.
struct BrokenRegistry;

#[async_trait]
impl AddressRegistry for BrokenRegistry {
    async fn register(&self, _: Identity, _: PushAddress) -> RegistryResult<()> {
        Err(RegistryError::Backend("disk on fire".into()))
    }

    async fn lookup(&self, _: &Identity) -> RegistryResult<Option<PushAddress>> {
        Err(RegistryError::Backend("disk on fire".into()))
    }

    async fn identities_in(&self, _: Namespace) -> RegistryResult<Vec<Identity>> {
        Err(RegistryError::Backend("disk on fire".into()))
    }

    async fn addresses_in(&self, _: Namespace) -> RegistryResult<Vec<PushAddress>> {
        Err(RegistryError::Backend("disk on fire".into()))
    }

    async fn count(&self) -> RegistryResult<usize> {
        Ok(0)
    }
}

// ── save-push-token ─────────────────────────────────────────────

#[tokio::test]
async fn save_push_token_returns_success() {
    let (base, _) = spawn_test_server().await;
    let resp = save_token(&base, "user-1", "ExponentPushToken[aaa]").await;

    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));

    let body: SaveTokenResponse = resp.json().await.unwrap();
    assert!(body.success);
}

#[tokio::test]
async fn save_push_token_requires_both_fields() {
    let (base, _) = spawn_test_server().await;

    for body in [json!({"token": "ExponentPushToken[a]"}), json!({"userId": "user-1"}), json!({})] {
        let resp = reqwest::Client::new()
            .post(format!("{}/api/save-push-token", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert_eq!(err.error, "Token and userId are required");
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/api/save-push-token", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let err: ErrorResponse = resp.json().await.unwrap();
    assert!(err.error.starts_with("Invalid request body"));
}

// ── send-notification ───────────────────────────────────────────

#[tokio::test]
async fn send_to_registered_user() {
    let (base, provider) = spawn_test_server().await;
    save_token(&base, "user-1", "ExponentPushToken[aaa]").await;

    let resp = send(&base, json!({"recipientId": "user-1", "title": "Hi", "body": "Hello"})).await;

    assert_eq!(resp.status(), 200);
    let body: SendNotificationResponse = resp.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.tickets.len(), 1);
    assert_eq!(body.message, "Notification sent to 1 device(s)");
    assert_eq!(provider.message_count(), 1);
}

#[tokio::test]
async fn tickets_keep_provider_shape() {
    let (base, _) = spawn_test_server().await;
    save_token(&base, "user-1", "ExponentPushToken[aaa]").await;

    let resp = send(&base, json!({"recipientId": "user-1", "title": "Hi", "body": "Hello"})).await;
    let body: serde_json::Value = resp.json().await.unwrap();

    assert_eq!(body["tickets"][0]["status"], "ok");
    assert!(body["tickets"][0]["id"].is_string());
}

#[tokio::test]
async fn send_to_unknown_user_is_not_found() {
    let (base, provider) = spawn_test_server().await;

    let resp = send(&base, json!({"recipientId": "user-2", "title": "Hi", "body": "Hello"})).await;

    assert_eq!(resp.status(), 404);
    let err: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(err.error, "No valid recipients found");
    assert!(provider.batches().is_empty());
}

#[tokio::test]
async fn send_to_all_dietitians() {
    let (base, provider) = spawn_test_server().await;
    save_token(&base, "dietitian-1", "ExponentPushToken[d1]").await;
    save_token(&base, "dietitian-2", "ExponentPushToken[d2]").await;
    save_token(&base, "user-1", "ExponentPushToken[u1]").await;

    let resp = send(
        &base,
        json!({"recipientId": "all-dietitians", "title": "New chat", "body": "A client is waiting", "data": {"chatId": 9}}),
    )
    .await;

    assert_eq!(resp.status(), 200);
    let body: SendNotificationResponse = resp.json().await.unwrap();
    assert_eq!(body.tickets.len(), 2);
    assert_eq!(body.message, "Notification sent to 2 device(s)");

    let sent: Vec<_> = provider.batches().into_iter().flatten().collect();
    assert!(sent.iter().all(|m| m.data == Some(json!({"chatId": 9}))));
}

#[tokio::test]
async fn missing_title_is_bad_request() {
    let (base, provider) = spawn_test_server().await;
    save_token(&base, "user-1", "ExponentPushToken[aaa]").await;

    let resp = send(&base, json!({"recipientId": "user-1", "body": "Hello"})).await;

    assert_eq!(resp.status(), 400);
    let err: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(err.error, "recipientId, title and body are required");
    assert!(provider.batches().is_empty());
}

#[tokio::test]
async fn failed_chunks_still_report_success() {
    let provider = Arc::new(MockProvider::failing_batches([0]));
    let orchestrator = Orchestrator::new(
        Arc::new(MemoryRegistry::new()),
        provider.clone(),
        DeliveryConfig::default(),
    );
    let base = spawn_server(orchestrator).await;
    save_token(&base, "user-1", "ExponentPushToken[aaa]").await;

    let resp = send(&base, json!({"recipientId": "user-1", "title": "Hi", "body": "Hello"})).await;

    assert_eq!(resp.status(), 200);
    let body: SendNotificationResponse = resp.json().await.unwrap();
    assert!(body.success);
    assert!(body.tickets.is_empty());
    assert_eq!(body.message, "Notification sent to 1 device(s)");
}

#[tokio::test]
async fn registry_failure_is_generic_internal_error() {
    let orchestrator = Orchestrator::new(
        Arc::new(BrokenRegistry),
        Arc::new(MockProvider::new()),
        DeliveryConfig::default(),
    );
    let base = spawn_server(orchestrator).await;

    let resp = send(&base, json!({"recipientId": "user-1", "title": "Hi", "body": "Hello"})).await;
    assert_eq!(resp.status(), 500);
    let err: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(err.error, "Failed to send notifications");

    let resp = save_token(&base, "user-1", "ExponentPushToken[aaa]").await;
    assert_eq!(resp.status(), 500);
    let err: ErrorResponse = resp.json().await.unwrap();
    assert_eq!(err.error, "Failed to save push token");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/nonexistent", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn get_on_post_route_is_rejected() {
    let (base, _) = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/send-notification", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 405);
}
