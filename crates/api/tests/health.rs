//! Integration tests for the health check, sitemap and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_bytes, body_json, get};
use tower::ServiceExt;
use sqlx::PgPool;
use sweetbox_db::models::category::CreateCategory;
use sweetbox_db::repositories::CategoryRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["integrations"]["payments"], true);
    assert_eq!(json["integrations"]["media"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_missing_integrations(pool: PgPool) {
    let app = common::build_bare_app(pool);
    let json = body_json(get(app, "/health").await).await;

    assert_eq!(json["integrations"]["identity"], false);
    assert_eq!(json["integrations"]["payments"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn storefront_origin_can_read_request_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get("access-control-expose-headers").unwrap(),
        "x-request-id"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_origin_gets_no_cors_grant(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shop_status_reports_always_open(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/shop/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_open"], true);
    assert!(json["data"]["next_change_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sitemap_lists_static_pages_and_categories(pool: PgPool) {
    CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Brownies".into(),
            description: None,
            image_url: None,
            sort_order: None,
            is_active: None,
        },
        "brownies",
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, "/sitemap.xml").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("application/xml"));

    let xml = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<loc>https://sweetbox.test/</loc>"));
    assert!(xml.contains("<loc>https://sweetbox.test/menu/brownies</loc>"));
}
