//! Handlers for `/products` and `/admin/products`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sweetbox_core::error::CoreError;
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::product::{validate_details, validate_name, validate_price};
use sweetbox_core::types::DbId;
use sweetbox_db::models::product::{CreateProduct, ProductListParams, UpdateProduct};
use sweetbox_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

async fn ensure_category_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/products?category=&search=&limit=&offset=
///
/// Active products in active categories. `include_inactive` is ignored here.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let products = ProductRepo::list_filtered(
        &state.pool,
        non_blank(params.category.as_deref()),
        non_blank(params.search.as_deref()),
        false,
        limit,
        offset,
    )
    .await?;

    Ok(Json(ApiResponse::ok(products)))
}

/// GET /api/v1/products/{slug}
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product '{slug}' not found")))?;
    Ok(Json(ApiResponse::ok(product)))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/products
pub async fn admin_list_products(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let products = ProductRepo::list_filtered(
        &state.pool,
        non_blank(params.category.as_deref()),
        non_blank(params.search.as_deref()),
        params.include_inactive,
        limit,
        offset,
    )
    .await?;

    Ok(Json(ApiResponse::ok(products)))
}

/// POST /api/v1/admin/products
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    let slug = validate_name(&input.name)?;
    validate_price(input.price_paise)?;
    validate_details(input.description.as_deref(), input.image_url.as_deref())?;
    ensure_category_exists(&state, input.category_id).await?;

    let product = ProductRepo::create(&state.pool, &input, &slug).await?;
    state.caches.invalidate_catalog().await;

    tracing::info!(product_id = product.id, slug = %product.slug, admin_id = admin.user_id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Product created", product)),
    ))
}

/// PUT /api/v1/admin/products/{id}
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    let slug = input.name.as_deref().map(validate_name).transpose()?;
    if let Some(price) = input.price_paise {
        validate_price(price)?;
    }
    validate_details(input.description.as_deref(), input.image_url.as_deref())?;
    if let Some(category_id) = input.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let product = ProductRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    state.caches.invalidate_catalog().await;

    Ok(Json(ApiResponse::new("Product updated", product)))
}

/// DELETE /api/v1/admin/products/{id}
///
/// Products are deactivated rather than removed so past orders keep
/// their references.
pub async fn delete_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProductRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }));
    }
    state.caches.invalidate_catalog().await;

    tracing::info!(product_id = id, admin_id = admin.user_id, "Product deactivated");

    Ok(StatusCode::NO_CONTENT)
}
