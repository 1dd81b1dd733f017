//! Handlers for checkout, payment verification and order management.
//!
//! Checkout creates a pending order and a matching gateway order. The
//! order is confirmed only once a captured payment is proven, either by
//! the browser's signed callback (`verify-payment`) or by the gateway
//! webhook, whichever arrives first.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use sweetbox_core::cart::Adjustment;
use sweetbox_core::error::CoreError;
use sweetbox_core::order::{
    compute_totals, generate_order_number, validate_delivery, validate_status, validate_transition,
    PAYMENT_PAID, STATUS_CANCELLED, STATUS_PENDING,
};
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::payment::{CURRENCY_INR, PROVIDER_RAZORPAY, STATUS_CAPTURED, STATUS_FAILED};
use sweetbox_core::types::{DbId, Paise};
use sweetbox_db::models::order::{
    CheckoutRequest, NewOrder, NewOrderItem, Order, OrderListParams, OrderWithItems,
    UpdateOrderStatus, VerifyPayment,
};
use sweetbox_db::models::payment::NewPayment;
use sweetbox_db::repositories::{CartRepo, OrderRepo, UserRepo};
use sweetbox_events::bus::{ORDER_CONFIRMED, ORDER_STATUS_CHANGED};
use sweetbox_events::payloads::{OrderConfirmed, OrderLine, OrderStatusChanged};
use sweetbox_events::PlatformEvent;

use super::cart::reconcile_cart;
use super::publish_event;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PaymentIntent {
    pub key_id: String,
    pub gateway_order_id: String,
    pub amount_paise: Paise,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderWithItems,
    pub payment: PaymentIntent,
    pub adjustments: Vec<Adjustment>,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn load_order(state: &AppState, id: DbId) -> AppResult<Order> {
    OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))
}

/// Publish the confirmation e-mail event for a freshly paid order.
///
/// Failures to load the buyer are logged; the payment itself already
/// succeeded.
pub(crate) async fn notify_order_confirmed(state: &AppState, order: &Order) {
    let (user, items) = match tokio::try_join!(
        UserRepo::find_by_id(&state.pool, order.user_id),
        OrderRepo::items_for(&state.pool, order.id),
    ) {
        Ok((Some(user), items)) => (user, items),
        Ok((None, _)) => {
            tracing::warn!(order_id = order.id, "Confirmed order has no user; skipping e-mail");
            return;
        }
        Err(e) => {
            tracing::error!(order_id = order.id, error = %e, "Failed to load order for confirmation e-mail");
            return;
        }
    };

    publish_event(
        state,
        PlatformEvent::new(ORDER_CONFIRMED)
            .with_source("order", order.id)
            .with_actor(order.user_id),
        &OrderConfirmed {
            order_id: order.id,
            order_number: order.order_number.clone(),
            email: user.email,
            name: user.name,
            hostel: order.hostel.clone(),
            room: order.room.clone(),
            items: items
                .into_iter()
                .map(|i| OrderLine {
                    line_total_paise: i.unit_price_paise * Paise::from(i.quantity),
                    product_name: i.product_name,
                    quantity: i.quantity,
                })
                .collect(),
            delivery_fee_paise: order.delivery_fee_paise,
            total_paise: order.total_paise,
        },
    );
}

/// Publish a status-change e-mail event for `order`.
pub(crate) async fn notify_status_changed(state: &AppState, order: &Order, actor: Option<DbId>) {
    let user = match UserRepo::find_by_id(&state.pool, order.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            tracing::error!(order_id = order.id, error = %e, "Failed to load user for status e-mail");
            return;
        }
    };

    let mut event = PlatformEvent::new(ORDER_STATUS_CHANGED).with_source("order", order.id);
    if let Some(actor) = actor {
        event = event.with_actor(actor);
    }
    publish_event(
        state,
        event,
        &OrderStatusChanged {
            order_id: order.id,
            order_number: order.order_number.clone(),
            email: user.email,
            name: user.name,
            status: order.status.clone(),
        },
    );
}

/// Record a captured payment against `order` and confirm it.
///
/// Idempotent: when the order is already paid the stored order is
/// returned and no event is published. Returns `Conflict` when the order
/// can no longer be confirmed (e.g. it was cancelled).
pub(crate) async fn confirm_order_payment(
    state: &AppState,
    order: &Order,
    gateway_order_id: &str,
    gateway_payment_id: &str,
) -> AppResult<Order> {
    let payment = NewPayment {
        order_id: order.id,
        user_id: order.user_id,
        provider: PROVIDER_RAZORPAY.into(),
        provider_order_id: gateway_order_id.into(),
        provider_payment_id: gateway_payment_id.into(),
        amount_paise: order.total_paise,
        currency: CURRENCY_INR.into(),
        status: STATUS_CAPTURED.into(),
    };

    match OrderRepo::confirm_payment(&state.pool, order.id, &payment).await? {
        Some(confirmed) => {
            tracing::info!(
                order_id = confirmed.id,
                order_number = %confirmed.order_number,
                payment_id = gateway_payment_id,
                "Order paid and confirmed"
            );
            notify_order_confirmed(state, &confirmed).await;
            Ok(confirmed)
        }
        None => {
            let current = load_order(state, order.id).await?;
            if current.payment_status == PAYMENT_PAID {
                Ok(current)
            } else {
                Err(AppError::Core(CoreError::Conflict(format!(
                    "Order {} can no longer be paid (status: {})",
                    current.order_number, current.status
                ))))
            }
        }
    }
}

pub(crate) async fn record_failed_attempt(
    state: &AppState,
    order: &Order,
    gateway_order_id: &str,
    gateway_payment_id: &str,
) -> AppResult<()> {
    let payment = NewPayment {
        order_id: order.id,
        user_id: order.user_id,
        provider: PROVIDER_RAZORPAY.into(),
        provider_order_id: gateway_order_id.into(),
        provider_payment_id: gateway_payment_id.into(),
        amount_paise: order.total_paise,
        currency: CURRENCY_INR.into(),
        status: STATUS_FAILED.into(),
    };
    OrderRepo::record_failed_payment(&state.pool, order.id, &payment).await?;
    tracing::warn!(order_id = order.id, payment_id = gateway_payment_id, "Payment attempt failed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

/// POST /api/v1/orders/checkout
///
/// Turn the (reconciled) cart into a pending order and open a gateway
/// order for its total. The cart is emptied only after payment.
pub async fn checkout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    if !state.config.shop_hours.is_open_at(Utc::now()) {
        return Err(AppError::Core(CoreError::Conflict(
            "The shop is closed right now; please order during opening hours".into(),
        )));
    }
    let notes = input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
    validate_delivery(&input.hostel, &input.room, &input.phone, notes)?;
    let gateway = state.payment_gateway()?;

    let adjustments = reconcile_cart(&state.pool, auth.user_id).await?;
    let lines = CartRepo::list_view(&state.pool, auth.user_id).await?;
    if lines.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Your cart is empty".into(),
        )));
    }

    let priced: Vec<(Paise, i32)> = lines
        .iter()
        .map(|l| (l.unit_price_paise, l.quantity))
        .collect();
    let totals = compute_totals(
        &priced,
        state.config.delivery_fee_paise,
        state.config.free_delivery_threshold_paise,
    );

    let order_number = generate_order_number();
    let gateway_order = gateway
        .create_order(totals.total_paise, &order_number)
        .await?;

    let new_order = NewOrder {
        order_number,
        user_id: auth.user_id,
        hostel: input.hostel.trim().to_string(),
        room: input.room.trim().to_string(),
        phone: input.phone.trim().to_string(),
        notes: notes.map(String::from),
        subtotal_paise: totals.subtotal_paise,
        delivery_fee_paise: totals.delivery_fee_paise,
        total_paise: totals.total_paise,
        items: lines
            .into_iter()
            .map(|l| NewOrderItem {
                product_id: l.product_id,
                category_id: Some(l.category_id),
                product_name: l.product_name,
                unit_price_paise: l.unit_price_paise,
                quantity: l.quantity,
            })
            .collect(),
    };

    let mut created = OrderRepo::create(&state.pool, &new_order).await?;
    if let Some(order) =
        OrderRepo::set_gateway_order_id(&state.pool, created.order.id, &gateway_order.id).await?
    {
        created.order = order;
    }

    tracing::info!(
        order_id = created.order.id,
        order_number = %created.order.order_number,
        total_paise = created.order.total_paise,
        gateway_order_id = %gateway_order.id,
        user_id = auth.user_id,
        "Checkout started"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Order created; complete the payment to confirm it",
            CheckoutResponse {
                order: created,
                payment: PaymentIntent {
                    key_id: gateway.key_id().to_string(),
                    gateway_order_id: gateway_order.id,
                    amount_paise: gateway_order.amount,
                    currency: gateway_order.currency,
                },
                adjustments,
            },
        )),
    ))
}

/// POST /api/v1/orders/{id}/verify-payment
///
/// Verify the signature the gateway handed to the browser and confirm
/// the order. An invalid signature is recorded as a failed attempt.
pub async fn verify_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<VerifyPayment>,
) -> AppResult<impl IntoResponse> {
    let gateway = state.payment_gateway()?;
    let order = load_order(&state, id).await?;
    if order.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::NotFound { entity: "Order", id }));
    }

    if order.payment_status == PAYMENT_PAID {
        let current = OrderRepo::find_with_items(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
        return Ok(Json(ApiResponse::new("Payment already verified", current)));
    }

    if order.gateway_order_id.as_deref() != Some(input.gateway_order_id.as_str()) {
        return Err(AppError::BadRequest(
            "Payment does not belong to this order".into(),
        ));
    }

    let valid = gateway.verify_checkout(
        &input.gateway_order_id,
        &input.gateway_payment_id,
        &input.signature,
    )?;
    if !valid {
        record_failed_attempt(&state, &order, &input.gateway_order_id, &input.gateway_payment_id)
            .await?;
        return Err(AppError::BadRequest("Payment signature is invalid".into()));
    }

    confirm_order_payment(&state, &order, &input.gateway_order_id, &input.gateway_payment_id)
        .await?;

    let confirmed = OrderRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    Ok(Json(ApiResponse::new("Payment verified", confirmed)))
}

/// GET /api/v1/orders
pub async fn list_my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let orders = OrderRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/v1/orders/{id}
///
/// Customers can read their own orders; admins can read any.
pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = OrderRepo::find_with_items(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    if order.order.user_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only view your own orders".into(),
        )));
    }
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/v1/orders/{id}/cancel
///
/// Customers can cancel their own order while it is still pending.
pub async fn cancel_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = load_order(&state, id).await?;
    if order.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::NotFound { entity: "Order", id }));
    }
    if order.status != STATUS_PENDING || order.payment_status == PAYMENT_PAID {
        return Err(AppError::Core(CoreError::Conflict(
            "Only unpaid pending orders can be cancelled".into(),
        )));
    }

    let cancelled = OrderRepo::update_status(&state.pool, id, STATUS_PENDING, STATUS_CANCELLED)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Order status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(order_id = id, user_id = auth.user_id, "Order cancelled by customer");

    Ok(Json(ApiResponse::new("Order cancelled", cancelled)))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/orders?status=&hostel=&limit=&offset=
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = params.status.as_deref() {
        validate_status(status)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let hostel = params.hostel.as_deref().map(str::trim).filter(|h| !h.is_empty());

    let orders =
        OrderRepo::list_filtered(&state.pool, params.status.as_deref(), hostel, limit, offset)
            .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// PUT /api/v1/admin/orders/{id}/status
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderStatus>,
) -> AppResult<impl IntoResponse> {
    validate_status(&input.status)?;
    let order = load_order(&state, id).await?;
    validate_transition(&order.status, &input.status)?;

    let updated = OrderRepo::update_status(&state.pool, id, &order.status, &input.status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Order status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(
        order_id = id,
        from = %order.status,
        to = %updated.status,
        admin_id = admin.user_id,
        "Order status changed"
    );

    notify_status_changed(&state, &updated, Some(admin.user_id)).await;

    Ok(Json(ApiResponse::new("Order status updated", updated)))
}
