//! Route definitions for products.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Public routes mounted at `/products`.
///
/// ```text
/// GET /          -> list_products
/// GET /{slug}    -> get_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products))
        .route("/{slug}", get(products::get_product))
}

/// Admin routes mounted at `/admin/products`.
///
/// ```text
/// GET    /        -> admin_list_products
/// POST   /        -> create_product
/// PUT    /{id}    -> update_product
/// DELETE /{id}    -> delete_product (deactivates)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::admin_list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            put(products::update_product).delete(products::delete_product),
        )
}
