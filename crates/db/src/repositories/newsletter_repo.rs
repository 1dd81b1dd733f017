//! Repository for the `newsletter_subscribers` table.

use sqlx::PgPool;
use sweetbox_core::newsletter::{STATUS_SUBSCRIBED, STATUS_UNSUBSCRIBED};
use sweetbox_core::types::DbId;

use crate::models::newsletter::Subscriber;

/// Column list for `newsletter_subscribers` queries.
const COLUMNS: &str = "\
    id, email, name, status, unsubscribe_token, subscribed_at, unsubscribed_at, \
    created_at, updated_at";

pub struct NewsletterRepo;

impl NewsletterRepo {
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM newsletter_subscribers WHERE email = $1");
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Subscribe an address, reactivating it if it had unsubscribed.
    ///
    /// Returns `None` when the address is already subscribed. A reactivated
    /// row keeps its original unsubscribe token.
    pub async fn subscribe(
        pool: &PgPool,
        email: &str,
        name: Option<&str>,
        token: &str,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!(
            "INSERT INTO newsletter_subscribers (email, name, status, unsubscribe_token) \
             VALUES ($1, $2, $4, $3) \
             ON CONFLICT (email) DO UPDATE SET \
                 status = $4, \
                 name = COALESCE(EXCLUDED.name, newsletter_subscribers.name), \
                 subscribed_at = NOW(), \
                 unsubscribed_at = NULL \
             WHERE newsletter_subscribers.status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(email)
            .bind(name)
            .bind(token)
            .bind(STATUS_SUBSCRIBED)
            .bind(STATUS_UNSUBSCRIBED)
            .fetch_optional(pool)
            .await
    }

    /// Unsubscribe the row owning `token`. Returns `None` for unknown tokens.
    ///
    /// Unsubscribing twice is a no-op that still returns the row.
    pub async fn unsubscribe_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletter_subscribers SET \
                 status = $2, \
                 unsubscribed_at = COALESCE(unsubscribed_at, NOW()) \
             WHERE unsubscribe_token = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(token)
            .bind(STATUS_UNSUBSCRIBED)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subscriber>, sqlx::Error> {
        let (where_clause, param_idx) = match status {
            Some(_) => ("WHERE status = $1", 2),
            None => ("", 1),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers {where_clause} \
             ORDER BY subscribed_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, Subscriber>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Every currently subscribed row, for a broadcast.
    pub async fn list_subscribed(pool: &PgPool) -> Result<Vec<Subscriber>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers WHERE status = $1 ORDER BY id"
        );
        sqlx::query_as::<_, Subscriber>(&query)
            .bind(STATUS_SUBSCRIBED)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
