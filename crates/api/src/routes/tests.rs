use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use society_core::dashboard::DashboardCache;
use society_shared::config::PaymentConfig;
use society_shared::{JwtConfig, JwtService};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{AppState, create_router};

fn test_state() -> AppState {
    AppState {
        db: Arc::new(DatabaseConnection::Disconnected),
        jwt_service: Arc::new(JwtService::new(&JwtConfig {
            secret: "router-test-secret".to_string(),
            access_token_expiry_secs: 900,
        })),
        dashboard_cache: Arc::new(DashboardCache::new()),
        payment: Arc::new(PaymentConfig {
            key_id: "key_test".to_string(),
            webhook_secret: "whsec_test".to_string(),
        }),
        dues_timezone: chrono_tz::Asia::Kolkata,
    }
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(test_state()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn valid_token() -> String {
    test_state()
        .jwt_service
        .generate_access_token(Uuid::now_v7(), None)
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unreachable");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[case("/api/v1/societies")]
#[case("/api/v1/societies/0190a1d2-0000-7000-8000-000000000000/dashboard")]
#[case("/api/v1/societies/0190a1d2-0000-7000-8000-000000000000/dues")]
#[tokio::test]
async fn test_protected_routes_require_token(#[case] uri: &str) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let request = Request::get("/api/v1/societies")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let payload = json!({"email": "not-an-email", "password": "whatever"});
    let (status, body) = send(json_request("POST", "/api/v1/auth/login", &payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let payload = json!({
        "email": "resident@example.com",
        "password": "short",
        "full_name": "Resident",
    });
    let (status, _) = send(json_request("POST", "/api/v1/auth/register", &payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_confirmation_validates_before_storage() {
    let payload = json!({
        "society_id": Uuid::now_v7(),
        "order_id": "order_1",
        "payment_id": "pay_1",
        "signature": "abc",
        "amount": "2500",
        "targets": [{"type": "due", "id": Uuid::now_v7()}],
    });
    let token = valid_token();
    let (status, body) = send(json_request(
        "POST",
        "/api/v1/payments/confirm",
        &payload,
        Some(&token),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_storage_failure_hides_details() {
    let token = valid_token();
    let request = Request::get("/api/v1/societies")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE_ERROR");
    assert!(!body["message"].as_str().unwrap_or_default().contains("Disconnected"));
}
