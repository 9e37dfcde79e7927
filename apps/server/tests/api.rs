use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use skc::domain::config::{ApiConfig, StorageBackend};
use skc_server::Server;
use tower::ServiceExt;

fn config() -> ApiConfig {
    let mut cfg = ApiConfig::default();
    cfg.security.shared_secret = Some("test-secret-value".to_owned());
    cfg.security.admin_token = Some("ops-token".to_owned());
    cfg.storage.backend = StorageBackend::Memory;
    cfg
}

async fn router() -> Router {
    Server::builder().config(config()).build().await.unwrap().router()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn build_requires_shared_secret() {
    let mut cfg = config();
    cfg.security.shared_secret = None;

    let err = Server::builder().config(cfg).build().await.unwrap_err();
    assert!(format!("{err:#}").contains("shared_secret"));
}

#[tokio::test]
async fn build_rejects_missing_tls_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config();
    cfg.server.ssl = Some(skc::domain::config::SslConfig {
        cert: dir.path().join("cert.pem"),
        key: dir.path().join("key.pem"),
    });

    let err = Server::builder().config(cfg).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}

#[tokio::test]
async fn serves_health_and_docs() {
    let app = router().await;

    let (status, health) =
        send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "up");

    let response = app.clone().oneshot(Request::get("/api").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn end_to_end_credential_lifecycle() {
    let app = router().await;

    let (status, issued) = send(
        &app,
        post(
            "/credentials",
            &json!({
                "studentAddress": "0xABC",
                "issuerAddress": "0xDEF",
                "credential": { "type": "degree", "title": "B.Tech" }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let address = issued["address"].as_str().unwrap().to_owned();

    let (_, generated) =
        send(&app, post("/proofs", &json!({ "cid": address, "reveal": ["holder"] }))).await;
    let (_, report) = send(&app, post("/verify", &generated)).await;
    assert_eq!(report["verified"], true);
    assert_eq!(report["revealed"], json!({ "holder": "0xABC" }));

    let revoke = Request::post("/revocations")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-admin-token", "ops-token")
        .body(Body::from(json!({ "credId": address }).to_string()))
        .unwrap();
    let (status, _) = send(&app, revoke).await;
    assert_eq!(status, StatusCode::OK);

    let (_, report) = send(&app, post("/verify", &generated)).await;
    assert_eq!(report["verified"], false);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = router().await;
    let huge = "x".repeat(11 * 1024 * 1024);
    let body = json!({
        "studentAddress": "0xABC",
        "issuerAddress": "0xDEF",
        "credential": { "type": "degree", "title": huge }
    });

    let (status, _) = send(&app, post("/credentials", &body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
