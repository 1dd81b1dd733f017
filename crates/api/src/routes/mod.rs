pub mod auth;
pub mod banners;
pub mod cart;
pub mod categories;
pub mod contact;
pub mod dispatch;
pub mod donations;
pub mod health;
pub mod media;
pub mod newsletter;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shop;
pub mod site_notifications;
pub mod sitemap;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/session                         exchange identity token (public)
///
/// /users/me                             get, update, delete own account
///
/// /categories                           list active (public, cached)
/// /categories/{slug}                    category with products (public)
/// /products                             list, filter, search (public)
/// /products/{slug}                      product detail (public)
/// /banners                              live banners (public)
/// /notifications/active                 live notification strips (public)
/// /shop/status                          open/closed and next change (public)
///
/// /newsletter/subscribe                 subscribe (public)
/// /newsletter/unsubscribe               unsubscribe by token (public)
/// /contact                              contact form (public)
/// /donations                            pledge (auth)
/// /donations/mine                       own pledges (auth)
///
/// /cart                                 view, clear (auth)
/// /cart/items                           set quantity (auth)
/// /cart/items/{product_id}              remove line (auth)
///
/// /orders                               own orders (auth)
/// /orders/checkout                      create order + gateway order (auth)
/// /orders/{id}                          order detail (owner or admin)
/// /orders/{id}/verify-payment           confirm signed payment (auth)
/// /orders/{id}/cancel                   cancel unpaid order (auth)
///
/// /payments/webhook                     gateway webhook (signed)
///
/// /admin/users                          list users
/// /admin/users/{id}                     delete user
/// /admin/users/{id}/role                change role
/// /admin/categories                     list, create
/// /admin/categories/{id}                update, delete
/// /admin/products                       list, create
/// /admin/products/{id}                  update, deactivate
/// /admin/banners                        list, create
/// /admin/banners/{id}                   update, delete
/// /admin/notifications                  list, create
/// /admin/notifications/{id}             update, delete
/// /admin/newsletter                     list subscribers
/// /admin/newsletter/{id}                delete subscriber
/// /admin/newsletter/broadcast           send to all subscribers
/// /admin/contacts                       list messages
/// /admin/contacts/{id}                  get, update, delete
/// /admin/donations                      list pledges
/// /admin/donations/{id}                 delete pledge
/// /admin/donations/{id}/status          change status
/// /admin/cart/reconcile                 reconcile every cart
/// /admin/orders                         list, filter
/// /admin/orders/{id}/status             change status
/// /admin/payments                       payment ledger
/// /admin/dispatch                       dispatch board, record dispatch
/// /admin/media                          upload (multipart)
/// /admin/media/destroy                  delete hosted asset
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        // Storefront catalog.
        .nest("/categories", categories::router())
        .nest("/products", products::router())
        .nest("/banners", banners::router())
        .nest("/notifications", site_notifications::router())
        .nest("/shop", shop::router())
        // Engagement.
        .nest("/newsletter", newsletter::router())
        .nest("/contact", contact::router())
        .nest("/donations", donations::router())
        // Ordering.
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        // Admin.
        .nest("/admin/users", users::admin_router())
        .nest("/admin/categories", categories::admin_router())
        .nest("/admin/products", products::admin_router())
        .nest("/admin/banners", banners::admin_router())
        .nest("/admin/notifications", site_notifications::admin_router())
        .nest("/admin/newsletter", newsletter::admin_router())
        .nest("/admin/contacts", contact::admin_router())
        .nest("/admin/donations", donations::admin_router())
        .nest("/admin/cart", cart::admin_router())
        .nest("/admin/orders", orders::admin_router())
        .nest("/admin/payments", payments::admin_router())
        .nest("/admin/dispatch", dispatch::admin_router())
        .nest("/admin/media", media::admin_router())
}
