//! Account cleanup after a user is soft-deleted.
//!
//! Cleanup jobs go through the shared [`TaskQueue`] so deletions are
//! processed one at a time, in the order they were requested.

use sqlx::PgPool;
use sweetbox_core::error::CoreError;
use sweetbox_core::newsletter::STATUS_SUBSCRIBED;
use sweetbox_core::queue::TaskQueue;
use sweetbox_core::types::DbId;
use sweetbox_db::repositories::{CartRepo, NewsletterRepo, OrderRepo};

/// What a cleanup run changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub cart_lines_removed: u64,
    pub orders_cancelled: u64,
    pub newsletter_unsubscribed: bool,
}

/// Queue cleanup for `user_id`. Returns immediately.
pub fn enqueue(
    queue: &TaskQueue,
    pool: PgPool,
    user_id: DbId,
    email: String,
) -> Result<(), CoreError> {
    queue.enqueue(format!("user-cleanup:{user_id}"), async move {
        let report = cleanup_user(&pool, user_id, &email).await?;
        tracing::info!(
            user_id,
            cart_lines_removed = report.cart_lines_removed,
            orders_cancelled = report.orders_cancelled,
            newsletter_unsubscribed = report.newsletter_unsubscribed,
            "Account cleanup finished"
        );
        Ok::<(), sqlx::Error>(())
    })
}

/// Clear the cart, cancel unpaid pending orders and unsubscribe the
/// newsletter row for `email`.
pub async fn cleanup_user(
    pool: &PgPool,
    user_id: DbId,
    email: &str,
) -> Result<CleanupReport, sqlx::Error> {
    let cart_lines_removed = CartRepo::clear(pool, user_id).await?;
    let orders_cancelled = OrderRepo::cancel_unpaid_for_user(pool, user_id).await?;

    let newsletter_unsubscribed = match NewsletterRepo::find_by_email(pool, email).await? {
        Some(subscriber) if subscriber.status == STATUS_SUBSCRIBED => {
            NewsletterRepo::unsubscribe_by_token(pool, &subscriber.unsubscribe_token)
                .await?
                .is_some()
        }
        _ => false,
    };

    Ok(CleanupReport {
        cart_lines_removed,
        orders_cancelled,
        newsletter_unsubscribed,
    })
}
