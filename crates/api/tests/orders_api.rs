//! HTTP-level tests for the cart, checkout, payment confirmation (browser
//! callback and webhook) and order management.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, expect_error, get_auth, post_json_auth, post_raw, put_json_auth,
    token_for, TEST_KEY_SECRET, TEST_WEBHOOK_SECRET,
};
use serde_json::json;
use sqlx::PgPool;
use sweetbox_core::payment::sign;
use sweetbox_db::models::category::CreateCategory;
use sweetbox_db::models::product::{CreateProduct, Product, UpdateProduct};
use sweetbox_db::models::user::User;
use sweetbox_db::repositories::{CartRepo, CategoryRepo, OrderRepo, PaymentRepo, ProductRepo};
use sweetbox_events::bus::ORDER_CONFIRMED;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_product(pool: &PgPool, name: &str, slug: &str, price_paise: i64) -> Product {
    let category = match CategoryRepo::find_by_slug(pool, "cakes").await.unwrap() {
        Some(c) => c,
        None => CategoryRepo::create(
            pool,
            &CreateCategory {
                name: "Cakes".into(),
                description: None,
                image_url: None,
                sort_order: None,
                is_active: None,
            },
            "cakes",
        )
        .await
        .unwrap(),
    };
    ProductRepo::create(
        pool,
        &CreateProduct {
            category_id: category.id,
            name: name.into(),
            description: None,
            price_paise,
            image_url: None,
            is_available: None,
        },
        slug,
    )
    .await
    .unwrap()
}

fn product_update() -> UpdateProduct {
    UpdateProduct {
        category_id: None,
        name: None,
        description: None,
        price_paise: None,
        image_url: None,
        is_available: None,
        is_active: None,
    }
}

fn delivery() -> serde_json::Value {
    json!({ "hostel": "Block A", "room": "214", "phone": "9876543210" })
}

async fn add_to_cart(pool: &PgPool, user: &User, product_id: i64, quantity: i32) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/cart/items",
        json!({ "product_id": product_id, "quantity": quantity }),
        &token_for(user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Fill the cart and check out; returns `(order_id, gateway_order_id, total)`.
async fn checkout(pool: &PgPool, user: &User) -> (i64, String, i64) {
    let product = seed_product(pool, "Red Velvet", "red-velvet", 45_000).await;
    add_to_cart(pool, user, product.id, 2).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/orders/checkout", delivery(), &token_for(user)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    (
        data["order"]["id"].as_i64().unwrap(),
        data["payment"]["gateway_order_id"].as_str().unwrap().to_string(),
        data["order"]["total_paise"].as_i64().unwrap(),
    )
}

fn checkout_signature(gateway_order_id: &str, payment_id: &str) -> String {
    sign(&format!("{gateway_order_id}|{payment_id}"), TEST_KEY_SECRET).unwrap()
}

fn webhook_body(event: &str, gateway_order_id: &str, payment_id: &str, amount: i64) -> String {
    json!({
        "event": event,
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "order_id": gateway_order_id,
                    "amount": amount,
                    "currency": "INR",
                }
            }
        }
    })
    .to_string()
}

async fn send_webhook(pool: &PgPool, body: &str) -> serde_json::Value {
    let signature = sign(body, TEST_WEBHOOK_SECRET).unwrap();
    let app = common::build_test_app(pool.clone());
    let response = post_raw(
        app,
        "/api/v1/payments/webhook",
        body,
        &[("x-razorpay-signature", signature.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cart_totals_follow_catalog_prices(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Red Velvet", "red-velvet", 45_000).await;

    let cart = add_to_cart(&pool, &user, product.id, 2).await;
    assert_eq!(cart["subtotal_paise"], 90_000);
    assert_eq!(cart["items"][0]["product_slug"], "red-velvet");

    // A price change shows up as an adjustment on the next read.
    let mut update = product_update();
    update.price_paise = Some(50_000);
    ProductRepo::update(&pool, product.id, &update, None).await.unwrap();

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/cart", &token_for(&user)).await).await;
    assert_eq!(json["data"]["subtotal_paise"], 100_000);
    assert_eq!(json["data"]["adjustments"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unavailable_products_cannot_be_added(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Sold Out", "sold-out", 10_000).await;
    let mut update = product_update();
    update.is_available = Some(false);
    ProductRepo::update(&pool, product.id, &update, None).await.unwrap();

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        "/api/v1/cart/items",
        json!({ "product_id": product.id, "quantity": 1 }),
        &token_for(&user),
    )
    .await;

    expect_error(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn zero_quantity_removes_the_line(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Red Velvet", "red-velvet", 45_000).await;
    add_to_cart(&pool, &user, product.id, 1).await;

    let cart = add_to_cart(&pool, &user, product.id, 0).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
    assert_eq!(cart["total_paise"], 0);

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/cart/items/{}", product.id),
        &token_for(&user),
    )
    .await;
    expect_error(response, StatusCode::NOT_FOUND).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_quantity_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Red Velvet", "red-velvet", 45_000).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/api/v1/cart/items",
        json!({ "product_id": product.id, "quantity": -1 }),
        &token_for(&user),
    )
    .await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_reconcile_drops_deactivated_products(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Seasonal", "seasonal", 20_000).await;
    add_to_cart(&pool, &user, product.id, 1).await;
    ProductRepo::deactivate(&pool, product.id).await.unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/admin/cart/reconcile", json!({}), &token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["carts_checked"], 1);
    assert_eq!(json["data"]["lines_removed"], 1);
    assert!(CartRepo::list_lines(&pool, user.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn hidden_category_products_leave_the_cart(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Plum Cake", "plum-cake", 40_000).await;
    add_to_cart(&pool, &user, product.id, 2).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/categories/{}", product.category_id),
        json!({ "is_active": false }),
        &token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/cart", &token_for(&user)).await).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
    let adjustment = &json["data"]["adjustments"][0];
    assert_eq!(adjustment["kind"], "removed");
    assert_eq!(adjustment["product_id"], product.id);
    assert_eq!(adjustment["reason"], "unavailable");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/cart/items",
        json!({ "product_id": product.id, "quantity": 1 }),
        &token_for(&user),
    )
    .await;
    expect_error(response, StatusCode::CONFLICT).await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/orders/checkout", delivery(), &token_for(&user)).await;
    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn closed_account_cannot_refill_its_cart(pool: PgPool) {
    let user = common::create_user(&pool, "leaving").await;
    let token = token_for(&user);
    let product = seed_product(&pool, "Red Velvet", "red-velvet", 45_000).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        "/api/v1/cart/items",
        json!({ "product_id": product.id, "quantity": 2 }),
        &token,
    )
    .await;
    expect_error(response, StatusCode::UNAUTHORIZED).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/donations",
        json!({ "donor_name": "Leaving", "donor_email": "leaving@example.com" }),
        &token,
    )
    .await;
    expect_error(response, StatusCode::UNAUTHORIZED).await;

    assert!(CartRepo::list_lines(&pool, user.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_creates_pending_order_and_gateway_order(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool, "Red Velvet", "red-velvet", 45_000).await;
    add_to_cart(&pool, &user, product.id, 2).await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/orders/checkout", delivery(), &token_for(&user)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["order"]["status"], "pending");
    assert_eq!(data["order"]["payment_status"], "unpaid");
    assert_eq!(data["order"]["total_paise"], 90_000);
    assert_eq!(data["order"]["items"][0]["quantity"], 2);
    assert_eq!(data["payment"]["key_id"], common::TEST_KEY_ID);
    assert_eq!(data["payment"]["amount_paise"], 90_000);
    assert_eq!(
        data["payment"]["gateway_order_id"],
        data["order"]["gateway_order_id"]
    );

    // The cart is kept until the payment is confirmed.
    assert_eq!(CartRepo::list_lines(&pool, user.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_with_empty_cart_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let app = common::build_test_app(pool);

    let response =
        post_json_auth(app, "/api/v1/orders/checkout", delivery(), &token_for(&user)).await;

    assert_eq!(
        expect_error(response, StatusCode::BAD_REQUEST).await,
        "VALIDATION_ERROR"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_validates_delivery_details(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/orders/checkout",
        json!({ "hostel": "", "room": "214", "phone": "9876543210" }),
        &token_for(&user),
    )
    .await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_without_payment_gateway_returns_503(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let app = common::build_bare_app(pool);

    let response =
        post_json_auth(app, "/api/v1/orders/checkout", delivery(), &token_for(&user)).await;

    expect_error(response, StatusCode::SERVICE_UNAVAILABLE).await;
}

// ---------------------------------------------------------------------------
// Payment verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn verified_payment_confirms_order_and_empties_cart(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, _) = checkout(&pool, &user).await;
    let body = json!({
        "gateway_order_id": gateway_order_id,
        "gateway_payment_id": "pay_ok",
        "signature": checkout_signature(&gateway_order_id, "pay_ok"),
    });

    let state = common::build_test_state(pool.clone());
    let mut events = state.event_bus.subscribe();
    let app = common::build_app_for(state);
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        body.clone(),
        &token_for(&user),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "confirmed");
    assert_eq!(json["data"]["payment_status"], "paid");
    assert!(CartRepo::list_lines(&pool, user.id).await.unwrap().is_empty());

    let event = events.try_recv().unwrap();
    assert_eq!(event.event_type, ORDER_CONFIRMED);
    assert_eq!(event.payload["email"], "buyer@example.com");

    // A repeated callback is answered from the stored order.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        body,
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Payment already verified");

    assert_eq!(PaymentRepo::list_for_order(&pool, order_id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_signature_records_failed_attempt(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, _) = checkout(&pool, &user).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_forged",
            "signature": "00ff",
        }),
        &token_for(&user),
    )
    .await;
    expect_error(response, StatusCode::BAD_REQUEST).await;

    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.status, "pending");
    assert_eq!(order.payment_status, "failed");

    // The buyer can still complete the payment with the same payment id.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_forged",
            "signature": checkout_signature(&gateway_order_id, "pay_forged"),
        }),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let payments = PaymentRepo::list_for_order(&pool, order_id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, "captured");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_for_another_gateway_order_is_rejected(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, _, _) = checkout(&pool, &user).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        json!({
            "gateway_order_id": "order_someone_else",
            "gateway_payment_id": "pay_1",
            "signature": checkout_signature("order_someone_else", "pay_1"),
        }),
        &token_for(&user),
    )
    .await;

    assert_eq!(expect_error(response, StatusCode::BAD_REQUEST).await, "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn orders_are_private_to_their_owner(pool: PgPool) {
    let buyer = common::create_user(&pool, "buyer").await;
    let other = common::create_user(&pool, "other").await;
    let admin = common::create_admin(&pool, "boss").await;
    let (order_id, gateway_order_id, _) = checkout(&pool, &buyer).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/orders/{order_id}"), &token_for(&other)).await;
    expect_error(response, StatusCode::FORBIDDEN).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/verify-payment"),
        json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_1",
            "signature": checkout_signature(&gateway_order_id, "pay_1"),
        }),
        &token_for(&other),
    )
    .await;
    expect_error(response, StatusCode::NOT_FOUND).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/orders/{order_id}"), &token_for(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let mine = body_json(get_auth(app, "/api/v1/orders", &token_for(&other)).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn captured_webhook_confirms_order_once(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, total) = checkout(&pool, &user).await;
    let body = webhook_body("payment.captured", &gateway_order_id, "pay_hook", total);

    let ack = send_webhook(&pool, &body).await;
    assert_eq!(ack["handled"], true);

    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.status, "confirmed");
    assert_eq!(order.payment_status, "paid");

    // Gateway retries are harmless.
    send_webhook(&pool, &body).await;
    assert_eq!(PaymentRepo::list_for_order(&pool, order_id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_with_bad_signature_is_rejected(pool: PgPool) {
    let body = webhook_body("payment.captured", "order_x", "pay_x", 100);
    let app = common::build_test_app(pool);

    let response = post_raw(
        app,
        "/api/v1/payments/webhook",
        &body,
        &[("x-razorpay-signature", "deadbeef")],
    )
    .await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_without_signature_is_rejected(pool: PgPool) {
    let body = webhook_body("payment.captured", "order_x", "pay_x", 100);
    let app = common::build_test_app(pool);

    let response = post_raw(app, "/api/v1/payments/webhook", &body, &[]).await;

    expect_error(response, StatusCode::BAD_REQUEST).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_for_unknown_order_is_acknowledged(pool: PgPool) {
    let body = webhook_body("payment.captured", "order_unknown", "pay_x", 100);

    let ack = send_webhook(&pool, &body).await;

    assert_eq!(ack["handled"], false);
    assert_eq!(ack["event"], "payment.captured");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn webhook_amount_mismatch_leaves_order_pending(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, total) = checkout(&pool, &user).await;
    let body = webhook_body("payment.captured", &gateway_order_id, "pay_short", total - 100);

    let ack = send_webhook(&pool, &body).await;

    assert_eq!(ack["handled"], false);
    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.status, "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_webhook_marks_payment_failed(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, total) = checkout(&pool, &user).await;
    let body = webhook_body("payment.failed", &gateway_order_id, "pay_declined", total);

    let ack = send_webhook(&pool, &body).await;

    assert_eq!(ack["handled"], true);
    let order = OrderRepo::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.payment_status, "failed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unrelated_webhook_events_are_ignored(pool: PgPool) {
    let body = json!({ "event": "refund.created", "payload": {} }).to_string();

    let ack = send_webhook(&pool, &body).await;

    assert_eq!(ack["handled"], false);
}

// ---------------------------------------------------------------------------
// Cancellation and admin status changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_order_cannot_be_paid(pool: PgPool) {
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, total) = checkout(&pool, &user).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/cancel"),
        json!({}),
        &token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "cancelled");

    let ack = send_webhook(
        &pool,
        &webhook_body("payment.captured", &gateway_order_id, "pay_late", total),
    )
    .await;
    assert_eq!(ack["handled"], false);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/orders/{order_id}/cancel"),
        json!({}),
        &token_for(&user),
    )
    .await;
    expect_error(response, StatusCode::CONFLICT).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_moves_orders_along_the_workflow(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let user = common::create_user(&pool, "buyer").await;
    let (order_id, gateway_order_id, total) = checkout(&pool, &user).await;
    send_webhook(
        &pool,
        &webhook_body("payment.captured", &gateway_order_id, "pay_ok", total),
    )
    .await;
    let token = token_for(&admin);
    let uri = format!("/api/v1/admin/orders/{order_id}/status");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "status": "delivered" }), &token).await;
    expect_error(response, StatusCode::BAD_REQUEST).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "status": "preparing" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "preparing");

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, "/api/v1/admin/orders?status=preparing&hostel=Block%20A", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
