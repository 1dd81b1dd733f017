//! Handlers for `/categories` and `/admin/categories`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use sweetbox_core::category::{validate_details, validate_name};
use sweetbox_core::error::CoreError;
use sweetbox_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sweetbox_core::types::DbId;
use sweetbox_db::models::category::{Category, CreateCategory, UpdateCategory};
use sweetbox_db::models::product::Product;
use sweetbox_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryWithProducts {
    pub category: Category,
    pub products: Vec<Product>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// Active categories in display order. Served from the in-memory cache.
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = state.pool.clone();
    let categories = state
        .caches
        .categories
        .get_or_try_insert_with((), || async move { CategoryRepo::list(&pool, false).await })
        .await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// GET /api/v1/categories/{slug}
///
/// One active category with its active products.
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;

    let limit = clamp_limit(params.limit, MAX_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let products =
        ProductRepo::list_filtered(&state.pool, Some(&category.slug), None, false, limit, offset)
            .await?;

    Ok(Json(ApiResponse::ok(CategoryWithProducts { category, products })))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/categories
///
/// All categories, including inactive ones.
pub async fn admin_list_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT) as usize;
    let offset = clamp_offset(params.offset) as usize;
    let categories: Vec<Category> = CategoryRepo::list(&state.pool, true)
        .await?
        .into_iter()
        .skip(offset)
        .take(limit)
        .collect();
    Ok(Json(ApiResponse::ok(categories)))
}

/// POST /api/v1/admin/categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let slug = validate_name(&input.name)?;
    validate_details(input.description.as_deref(), input.image_url.as_deref())?;

    let category = CategoryRepo::create(&state.pool, &input, &slug).await?;
    state.caches.invalidate_catalog().await;

    tracing::info!(category_id = category.id, slug = %category.slug, admin_id = admin.user_id, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Category created", category)),
    ))
}

/// PUT /api/v1/admin/categories/{id}
///
/// Renaming a category also regenerates its slug.
pub async fn update_category(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let slug = input.name.as_deref().map(validate_name).transpose()?;
    validate_details(input.description.as_deref(), input.image_url.as_deref())?;

    let category = CategoryRepo::update(&state.pool, id, &input, slug.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    state.caches.invalidate_catalog().await;

    Ok(Json(ApiResponse::new("Category updated", category)))
}

/// DELETE /api/v1/admin/categories/{id}
///
/// Only empty categories can be deleted; deactivate the others instead.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let product_count = CategoryRepo::count_products(&state.pool, id).await?;
    if product_count > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category still has {product_count} product(s); move or remove them first"
        ))));
    }

    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    state.caches.invalidate_catalog().await;

    tracing::info!(category_id = id, admin_id = admin.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
