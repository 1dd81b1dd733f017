//! Handlers for the signed-in customer's cart.
//!
//! Every read goes through [`reconcile_cart`] first, so prices shown and
//! charged always match the live catalog.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use sweetbox_core::cart::{reconcile, validate_quantity, Adjustment, CartLine, ProductSnapshot, MAX_LINES};
use sweetbox_core::error::CoreError;
use sweetbox_core::order::compute_totals;
use sweetbox_core::types::{DbId, Paise};
use sweetbox_db::models::cart::{CartLineView, SetCartItem};
use sweetbox_db::repositories::{CartRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal_paise: Paise,
    pub delivery_fee_paise: Paise,
    pub total_paise: Paise,
    /// Changes made while reconciling; empty when nothing changed.
    pub adjustments: Vec<Adjustment>,
}

#[derive(Debug, Default, Serialize)]
pub struct ReconcileSummary {
    pub carts_checked: usize,
    pub lines_updated: usize,
    pub lines_removed: usize,
}

/// Refresh one user's cart against the catalog and return what changed.
pub(crate) async fn reconcile_cart(pool: &PgPool, user_id: DbId) -> Result<Vec<Adjustment>, sqlx::Error> {
    let lines: Vec<CartLine> = CartRepo::list_lines(pool, user_id)
        .await?
        .into_iter()
        .map(|item| CartLine {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price_paise: item.unit_price_paise,
        })
        .collect();
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = lines.iter().map(|l| l.product_id).collect();
    let catalog: HashMap<DbId, ProductSnapshot> = ProductRepo::find_many(pool, &ids)
        .await?
        .into_iter()
        .map(|p| {
            let snapshot = ProductSnapshot {
                price_paise: p.price_paise,
                purchasable: p.is_purchasable(),
            };
            (p.id, snapshot)
        })
        .collect();

    let adjustments = reconcile(&lines, &catalog);
    if !adjustments.is_empty() {
        CartRepo::apply_adjustments(pool, user_id, &adjustments).await?;
        tracing::debug!(user_id, changes = adjustments.len(), "Cart reconciled");
    }
    Ok(adjustments)
}

async fn cart_view(state: &AppState, user_id: DbId, adjustments: Vec<Adjustment>) -> AppResult<CartView> {
    let items = CartRepo::list_view(&state.pool, user_id).await?;
    let lines: Vec<(Paise, i32)> = items
        .iter()
        .map(|i| (i.unit_price_paise, i.quantity))
        .collect();
    let totals = compute_totals(
        &lines,
        state.config.delivery_fee_paise,
        state.config.free_delivery_threshold_paise,
    );
    Ok(CartView {
        items,
        subtotal_paise: totals.subtotal_paise,
        delivery_fee_paise: totals.delivery_fee_paise,
        total_paise: totals.total_paise,
        adjustments,
    })
}

/// GET /api/v1/cart
pub async fn get_cart(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let adjustments = reconcile_cart(&state.pool, auth.user_id).await?;
    let view = cart_view(&state, auth.user_id, adjustments).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// PUT /api/v1/cart/items
///
/// Set the quantity of one product. A quantity of 0 removes the line.
/// The line's unit price is snapshotted from the catalog.
pub async fn set_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SetCartItem>,
) -> AppResult<impl IntoResponse> {
    validate_quantity(input.quantity)?;

    if input.quantity == 0 {
        CartRepo::remove(&state.pool, auth.user_id, input.product_id).await?;
    } else {
        let product = ProductRepo::find_by_id(&state.pool, input.product_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Product",
                id: input.product_id,
            }))?;
        if !product.is_purchasable() {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "'{}' is not available right now",
                product.name
            ))));
        }

        let existing = CartRepo::list_lines(&state.pool, auth.user_id).await?;
        let is_new_line = !existing.iter().any(|l| l.product_id == product.id);
        if is_new_line && existing.len() >= MAX_LINES {
            return Err(AppError::Core(CoreError::Validation(format!(
                "A cart can hold at most {MAX_LINES} different products"
            ))));
        }

        CartRepo::upsert(
            &state.pool,
            auth.user_id,
            product.id,
            input.quantity,
            product.price_paise,
        )
        .await?;
    }

    let adjustments = reconcile_cart(&state.pool, auth.user_id).await?;
    let view = cart_view(&state, auth.user_id, adjustments).await?;
    Ok(Json(ApiResponse::new("Cart updated", view)))
}

/// DELETE /api/v1/cart/items/{product_id}
pub async fn remove_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CartRepo::remove(&state.pool, auth.user_id, product_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Cart item",
            id: product_id,
        }));
    }
    let view = cart_view(&state, auth.user_id, Vec::new()).await?;
    Ok(Json(ApiResponse::new("Item removed", view)))
}

/// DELETE /api/v1/cart
pub async fn clear_cart(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    CartRepo::clear(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/cart/reconcile
///
/// Reconcile every non-empty cart, e.g. after a bulk price change.
pub async fn reconcile_all(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mut summary = ReconcileSummary::default();
    for user_id in CartRepo::users_with_items(&state.pool).await? {
        let adjustments = reconcile_cart(&state.pool, user_id).await?;
        summary.carts_checked += 1;
        for adjustment in &adjustments {
            match adjustment {
                Adjustment::PriceChanged { .. } => summary.lines_updated += 1,
                Adjustment::Removed { .. } => summary.lines_removed += 1,
            }
        }
    }

    tracing::info!(
        carts = summary.carts_checked,
        updated = summary.lines_updated,
        removed = summary.lines_removed,
        admin_id = admin.user_id,
        "Carts reconciled"
    );

    Ok(Json(ApiResponse::new("Carts reconciled", summary)))
}
