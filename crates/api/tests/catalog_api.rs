//! HTTP-level tests for the storefront catalog, banners and site
//! notifications, and their admin management routes.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, delete_auth, expect_error, get, get_auth, post_json_auth, put_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_category(pool: &PgPool, token: &str, name: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/categories",
        json!({ "name": name, "description": "Fresh every morning" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_product(
    pool: &PgPool,
    token: &str,
    category_id: i64,
    name: &str,
    price_paise: i64,
) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/products",
        json!({ "category_id": category_id, "name": name, "price_paise": price_paise }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_category_with_derived_slug(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let category = create_category(&pool, &token_for(&admin), "Tea Cakes & Buns").await;

    assert_eq!(category["slug"], "tea-cakes-buns");
    assert_eq!(category["is_active"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_category_name_conflicts(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    create_category(&pool, &token, "Cookies").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/categories",
        json!({ "name": "Cookies" }),
        &token,
    )
    .await;

    assert_eq!(expect_error(response, StatusCode::CONFLICT).await, "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customers_cannot_edit_the_catalog(pool: PgPool) {
    let customer = common::create_user(&pool, "cust").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/categories",
        json!({ "name": "Sneaky" }),
        &token_for(&customer),
    )
    .await;

    expect_error(response, StatusCode::FORBIDDEN).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_listing_reflects_admin_edits(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);

    // Warm the cache with an empty list; the create must invalidate it.
    let state = common::build_test_state(pool.clone());
    let app = common::build_app_for(state.clone());
    let before = body_json(get(app, "/api/v1/categories").await).await;
    assert_eq!(before["data"].as_array().unwrap().len(), 0);

    let app = common::build_app_for(state.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/categories",
        json!({ "name": "Cakes" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cakes = body_json(response).await["data"].clone();

    let app = common::build_app_for(state.clone());
    let after = body_json(get(app, "/api/v1/categories").await).await;
    assert_eq!(after["data"].as_array().unwrap().len(), 1);

    // Deactivating hides it again.
    let app = common::build_app_for(state.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/categories/{}", cakes["id"]),
        json!({ "is_active": false }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_app_for(state);
    let hidden = body_json(get(app, "/api/v1/categories").await).await;
    assert_eq!(hidden["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_page_includes_its_products(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let category = create_category(&pool, &token, "Cakes").await;
    create_product(&pool, &token, category["id"].as_i64().unwrap(), "Red Velvet", 45_000).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/categories/cakes").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["category"]["name"], "Cakes");
    assert_eq!(json["data"]["products"][0]["slug"], "red-velvet");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_category_slug_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/categories/nope").await;

    assert_eq!(expect_error(response, StatusCode::NOT_FOUND).await, "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_with_products_cannot_be_deleted(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let category = create_category(&pool, &token, "Cakes").await;
    let id = category["id"].as_i64().unwrap();
    create_product(&pool, &token, id, "Red Velvet", 45_000).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/admin/categories/{id}"), &token).await;
    expect_error(response, StatusCode::CONFLICT).await;

    let empty = create_category(&pool, &token, "Empty").await;
    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/admin/categories/{}", empty["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_in_missing_category_returns_404(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/products",
        json!({ "category_id": 999_999, "name": "Ghost", "price_paise": 1000 }),
        &token_for(&admin),
    )
    .await;

    expect_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_price_is_rejected(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let category = create_category(&pool, &token, "Cakes").await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/admin/products",
        json!({ "category_id": category["id"], "name": "Free Cake", "price_paise": 0 }),
        &token,
    )
    .await;

    assert_eq!(
        expect_error(response, StatusCode::BAD_REQUEST).await,
        "VALIDATION_ERROR"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_search_and_category_filter(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let cakes = create_category(&pool, &token, "Cakes").await;
    let cookies = create_category(&pool, &token, "Cookies").await;
    create_product(&pool, &token, cakes["id"].as_i64().unwrap(), "Chocolate Truffle", 50_000).await;
    create_product(&pool, &token, cookies["id"].as_i64().unwrap(), "Chocolate Chip", 8_000).await;
    create_product(&pool, &token, cookies["id"].as_i64().unwrap(), "Oatmeal", 7_000).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/products?search=chocolate").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/products?category=cookies").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Chocolate Chip", "Oatmeal"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleted_product_disappears_from_storefront(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let category = create_category(&pool, &token, "Cakes").await;
    let product =
        create_product(&pool, &token, category["id"].as_i64().unwrap(), "Red Velvet", 45_000).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/admin/products/{}", product["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/products/red-velvet").await;
    expect_error(response, StatusCode::NOT_FOUND).await;

    // Admins still see it when asking for inactive products.
    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, "/api/v1/admin/products?include_inactive=true", &token).await,
    )
    .await;
    assert_eq!(json["data"][0]["is_active"], false);
}

// ---------------------------------------------------------------------------
// Banners and site notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_live_banners_are_public(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);
    let now = Utc::now();

    for (title, starts_at) in [("Live", now - Duration::hours(1)), ("Later", now + Duration::days(1))] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(
            app,
            "/api/v1/admin/banners",
            json!({
                "title": title,
                "media_url": "https://cdn.example.com/banner.jpg",
                "starts_at": starts_at,
            }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/banners").await).await;
    let banners = json["data"].as_array().unwrap();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0]["title"], "Live");
    assert_eq!(banners[0]["media_type"], "image");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn banner_window_must_not_be_inverted(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let now = Utc::now();
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/banners",
        json!({
            "title": "Backwards",
            "media_url": "https://cdn.example.com/banner.jpg",
            "starts_at": now,
            "ends_at": now - Duration::hours(1),
        }),
        &token_for(&admin),
    )
    .await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_site_notifications_are_listed(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let token = token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/notifications",
        json!({ "title": "Diwali hours", "message": "Open until midnight this week" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await["data"].clone();
    assert_eq!(created["kind"], "info");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/notifications/active").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/admin/notifications/{}", created["id"]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/notifications/active").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_routes_need_a_configured_store(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/media/destroy",
        json!({ "public_id": "sweetbox/banners/abc" }),
        &token_for(&admin),
    )
    .await;

    assert_eq!(
        expect_error(response, StatusCode::SERVICE_UNAVAILABLE).await,
        "SERVICE_UNAVAILABLE"
    );
}
