#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sweetbox_api::auth::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
use sweetbox_api::auth::jwt::{generate_access_token, JwtConfig};
use sweetbox_api::config::ServerConfig;
use sweetbox_api::gateways::razorpay::{GatewayOrder, PaymentGateway};
use sweetbox_api::gateways::GatewayError;
use sweetbox_api::router::build_app_router;
use sweetbox_api::state::{AppState, PublicCaches};
use sweetbox_core::error::CoreError;
use sweetbox_core::payment::{verify_checkout_signature, verify_webhook_signature, CURRENCY_INR};
use sweetbox_core::queue::TaskQueue;
use sweetbox_core::shop_hours::ShopHours;
use sweetbox_core::types::Paise;
use sweetbox_db::models::user::{UpsertIdentity, User};
use sweetbox_db::repositories::UserRepo;
use sweetbox_events::EventBus;

pub const TEST_KEY_ID: &str = "rzp_test_key";
pub const TEST_KEY_SECRET: &str = "test-key-secret";
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// The shop never closes so checkout is not time-dependent, and delivery
/// is free so order totals equal the cart subtotal.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        site_url: "https://sweetbox.test".to_string(),
        shop_hours: ShopHours::parse("00:00", "00:00", 330).unwrap(),
        catalog_cache_ttl_secs: 60,
        delivery_fee_paise: 0,
        free_delivery_threshold_paise: None,
        admin_inbox: None,
    }
}

// ---------------------------------------------------------------------------
// Integration doubles
// ---------------------------------------------------------------------------

/// Gateway that creates orders locally and checks signatures with fixed secrets.
pub struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> &str {
        TEST_KEY_ID
    }

    async fn create_order(
        &self,
        amount_paise: Paise,
        receipt: &str,
    ) -> Result<GatewayOrder, GatewayError> {
        Ok(GatewayOrder {
            id: format!("order_{receipt}"),
            amount: amount_paise,
            currency: CURRENCY_INR.to_string(),
            receipt: Some(receipt.to_string()),
        })
    }

    fn verify_checkout(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<bool, CoreError> {
        verify_checkout_signature(gateway_order_id, gateway_payment_id, signature, TEST_KEY_SECRET)
    }

    fn verify_webhook(&self, body: &str, signature: &str) -> Result<bool, CoreError> {
        verify_webhook_signature(body, signature, TEST_WEBHOOK_SECRET)
    }
}

/// Accepts tokens of the form `uid:<uid>` and rejects everything else.
pub struct StaticIdentity;

#[async_trait]
impl IdentityVerifier for StaticIdentity {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let uid = id_token
            .strip_prefix("uid:")
            .filter(|u| !u.is_empty())
            .ok_or_else(|| IdentityError::InvalidToken("unknown test token".into()))?;
        Ok(VerifiedIdentity {
            uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            name: Some(uid.to_string()),
            phone: None,
        })
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build application state with the fake gateway and identity verifier.
pub fn build_test_state(pool: PgPool) -> AppState {
    let config = test_config();
    AppState {
        pool,
        caches: Arc::new(PublicCaches::new(Duration::from_secs(
            config.catalog_cache_ttl_secs,
        ))),
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
        task_queue: Arc::new(TaskQueue::start()),
        identity: Some(Arc::new(StaticIdentity)),
        payments: Some(Arc::new(FakeGateway)),
        media: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Goes through the same `build_app_router` as `main.rs` so integration
/// tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool), &test_config())
}

/// Build the router over an existing state, so tests can share caches and
/// subscribe to the event bus across requests.
pub fn build_app_for(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// Like [`build_test_app`] but without any optional integration configured.
pub fn build_bare_app(pool: PgPool) -> Router {
    let mut state = build_test_state(pool);
    state.identity = None;
    state.payments = None;
    state.media = None;
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, uid: &str) -> User {
    UserRepo::upsert_identity(
        pool,
        &UpsertIdentity {
            external_uid: uid.to_string(),
            email: format!("{uid}@example.com"),
            name: Some(uid.to_string()),
            phone: None,
        },
    )
    .await
    .expect("user upsert should succeed")
}

pub async fn create_admin(pool: &PgPool, uid: &str) -> User {
    let user = create_user(pool, uid).await;
    UserRepo::set_role(pool, user.id, "admin")
        .await
        .expect("role update should succeed")
        .expect("user should exist")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).expect("token should encode")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a raw body with extra headers (e.g. a signed webhook).
pub async fn post_raw(app: Router, uri: &str, body: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body should be JSON")
}

/// Assert the error envelope and return its `code`.
pub async fn expect_error(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["message"].is_string());
    json["code"].as_str().unwrap_or_default().to_string()
}
