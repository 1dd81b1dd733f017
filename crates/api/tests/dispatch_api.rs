//! HTTP-level tests for the admin dispatch board.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_error, get_auth, post_json_auth, token_for};
use serde_json::json;
use sqlx::PgPool;
use sweetbox_db::models::category::CreateCategory;
use sweetbox_db::models::order::{NewOrder, NewOrderItem};
use sweetbox_db::models::product::{CreateProduct, Product};
use sweetbox_db::repositories::{CategoryRepo, OrderRepo, ProductRepo};
use sweetbox_events::bus::ORDER_STATUS_CHANGED;

async fn seed_product(pool: &PgPool) -> Product {
    let category = CategoryRepo::create(
        pool,
        &CreateCategory {
            name: "Cupcakes".into(),
            description: None,
            image_url: None,
            sort_order: None,
            is_active: None,
        },
        "cupcakes",
    )
    .await
    .unwrap();
    ProductRepo::create(
        pool,
        &CreateProduct {
            category_id: category.id,
            name: "Vanilla Cupcake".into(),
            description: None,
            price_paise: 6_000,
            image_url: None,
            is_available: None,
        },
        "vanilla-cupcake",
    )
    .await
    .unwrap()
}

/// Insert a paid, confirmed order for `quantity` units of `product`.
async fn confirmed_order(
    pool: &PgPool,
    number: &str,
    user_id: i64,
    hostel: &str,
    product: &Product,
    quantity: i32,
) -> i64 {
    let subtotal = product.price_paise * i64::from(quantity);
    let created = OrderRepo::create(
        pool,
        &NewOrder {
            order_number: number.to_string(),
            user_id,
            hostel: hostel.to_string(),
            room: "12".into(),
            phone: "9876543210".into(),
            notes: None,
            subtotal_paise: subtotal,
            delivery_fee_paise: 0,
            total_paise: subtotal,
            items: vec![NewOrderItem {
                product_id: product.id,
                category_id: Some(product.category_id),
                product_name: product.name.clone(),
                unit_price_paise: product.price_paise,
                quantity,
            }],
        },
    )
    .await
    .unwrap();
    OrderRepo::update_status(pool, created.order.id, "pending", "confirmed")
        .await
        .unwrap()
        .unwrap();
    created.order.id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn board_groups_outstanding_units_by_hostel(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let buyer = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool).await;
    confirmed_order(&pool, "SB-1", buyer.id, "Block B", &product, 2).await;
    confirmed_order(&pool, "SB-2", buyer.id, "Block A", &product, 3).await;
    confirmed_order(&pool, "SB-3", buyer.id, "Block A", &product, 1).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/dispatch", &token_for(&admin)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let board = json["data"].as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["hostel"], "Block A");
    assert_eq!(board[0]["pending_quantity"], 4);
    assert_eq!(board[0]["categories"][0]["category_name"], "Cupcakes");
    assert_eq!(board[0]["categories"][0]["products"][0]["order_count"], 2);
    assert_eq!(board[1]["hostel"], "Block B");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_fills_oldest_orders_first(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let buyer = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool).await;
    let first = confirmed_order(&pool, "SB-1", buyer.id, "Block A", &product, 2).await;
    let second = confirmed_order(&pool, "SB-2", buyer.id, "Block A", &product, 3).await;

    let state = common::build_test_state(pool.clone());
    let mut events = state.event_bus.subscribe();
    let app = common::build_app_for(state);
    let response = post_json_auth(
        app,
        "/api/v1/admin/dispatch",
        json!({ "hostel": "Block A", "product_id": product.id, "quantity": 3 }),
        &token_for(&admin),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["dispatched_quantity"], 3);
    assert_eq!(json["data"]["orders_touched"], json!([first, second]));
    assert_eq!(json["data"]["orders_out_for_delivery"], json!([first]));

    let first_order = OrderRepo::find_by_id(&pool, first).await.unwrap().unwrap();
    assert_eq!(first_order.status, "out_for_delivery");
    let second_order = OrderRepo::find_by_id(&pool, second).await.unwrap().unwrap();
    assert_eq!(second_order.status, "confirmed");

    let event = events.try_recv().unwrap();
    assert_eq!(event.event_type, ORDER_STATUS_CHANGED);
    assert_eq!(event.source_entity_id, Some(first));

    // Only the remaining two units of the second order are left on the board.
    let app = common::build_test_app(pool);
    let board = body_json(get_auth(app, "/api/v1/admin/dispatch", &token_for(&admin)).await).await;
    assert_eq!(board["data"][0]["pending_quantity"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatching_more_than_outstanding_is_rejected(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let buyer = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool).await;
    let order_id = confirmed_order(&pool, "SB-1", buyer.id, "Block A", &product, 2).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/dispatch",
        json!({ "hostel": "Block A", "product_id": product.id, "quantity": 5 }),
        &token_for(&admin),
    )
    .await;

    assert_eq!(
        expect_error(response, StatusCode::BAD_REQUEST).await,
        "VALIDATION_ERROR"
    );
    let items = OrderRepo::items_for(&pool, order_id).await.unwrap();
    assert_eq!(items[0].dispatched_quantity, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unpaid_orders_are_not_dispatchable(pool: PgPool) {
    let admin = common::create_admin(&pool, "boss").await;
    let buyer = common::create_user(&pool, "buyer").await;
    let product = seed_product(&pool).await;
    let created = OrderRepo::create(
        &pool,
        &NewOrder {
            order_number: "SB-PENDING".into(),
            user_id: buyer.id,
            hostel: "Block A".into(),
            room: "12".into(),
            phone: "9876543210".into(),
            notes: None,
            subtotal_paise: 6_000,
            delivery_fee_paise: 0,
            total_paise: 6_000,
            items: vec![NewOrderItem {
                product_id: product.id,
                category_id: Some(product.category_id),
                product_name: product.name.clone(),
                unit_price_paise: 6_000,
                quantity: 1,
            }],
        },
    )
    .await
    .unwrap();
    assert_eq!(created.order.status, "pending");

    let app = common::build_test_app(pool);
    let board = body_json(get_auth(app, "/api/v1/admin/dispatch", &token_for(&admin)).await).await;
    assert_eq!(board["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispatch_is_admin_only(pool: PgPool) {
    let customer = common::create_user(&pool, "buyer").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/dispatch", &token_for(&customer)).await;

    expect_error(response, StatusCode::FORBIDDEN).await;
}
