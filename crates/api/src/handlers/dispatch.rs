//! Handlers for the kitchen dispatch board.
//!
//! The board lists outstanding units per hostel, category and product.
//! Dispatching a quantity spreads it over the oldest orders first; orders
//! whose every item is fully dispatched move to out-for-delivery.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::dispatch::{allocate, group_by_hostel, OutstandingItem, PendingLine};
use sweetbox_core::types::DbId;
use sweetbox_core::validation::validate_required;
use sweetbox_db::models::order::{DispatchOutcome, DispatchRequest};
use sweetbox_db::repositories::OrderRepo;

use super::orders::notify_status_changed;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

const UNCATEGORIZED: &str = "Uncategorized";

/// GET /api/v1/admin/dispatch
pub async fn dispatch_board(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let lines: Vec<PendingLine> = OrderRepo::dispatch_summary(&state.pool)
        .await?
        .into_iter()
        .map(|row| PendingLine {
            hostel: row.hostel,
            category_id: row.category_id,
            category_name: row.category_name.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            product_id: row.product_id,
            product_name: row.product_name,
            pending_quantity: row.pending_quantity,
            order_count: row.order_count,
        })
        .collect();

    Ok(Json(ApiResponse::ok(group_by_hostel(lines))))
}

/// POST /api/v1/admin/dispatch
///
/// Mark `quantity` units of one product as dispatched to one hostel.
/// Allocation and the status changes happen in a single transaction with
/// the affected items locked.
pub async fn dispatch_items(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DispatchRequest>,
) -> AppResult<impl IntoResponse> {
    validate_required("hostel", &input.hostel, sweetbox_core::order::MAX_HOSTEL_LENGTH)?;
    let hostel = input.hostel.trim();

    let mut tx = state.pool.begin().await?;

    let outstanding: Vec<OutstandingItem> =
        OrderRepo::lock_outstanding(&mut *tx, hostel, input.product_id)
            .await?
            .into_iter()
            .map(|row| OutstandingItem {
                order_item_id: row.order_item_id,
                order_id: row.order_id,
                remaining: row.remaining,
            })
            .collect();

    let allocations = allocate(&outstanding, input.quantity)?;
    OrderRepo::apply_allocations(&mut *tx, &allocations).await?;

    let orders_touched: Vec<DbId> = allocations
        .iter()
        .map(|a| a.order_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let orders_out_for_delivery = OrderRepo::advance_fully_dispatched(&mut *tx, &orders_touched).await?;

    tx.commit().await?;

    tracing::info!(
        hostel,
        product_id = input.product_id,
        quantity = input.quantity,
        orders = orders_touched.len(),
        out_for_delivery = orders_out_for_delivery.len(),
        admin_id = admin.user_id,
        "Items dispatched"
    );

    for order_id in &orders_out_for_delivery {
        if let Some(order) = OrderRepo::find_by_id(&state.pool, *order_id).await? {
            notify_status_changed(&state, &order, Some(admin.user_id)).await;
        }
    }

    Ok(Json(ApiResponse::new(
        "Dispatch recorded",
        DispatchOutcome {
            dispatched_quantity: input.quantity,
            orders_touched,
            orders_out_for_delivery,
        },
    )))
}
