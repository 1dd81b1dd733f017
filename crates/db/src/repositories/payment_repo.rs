//! Repository for the `payments` table.

use sqlx::{PgConnection, PgPool};
use sweetbox_core::payment::STATUS_CAPTURED;
use sweetbox_core::types::DbId;

use crate::models::payment::{NewPayment, Payment};

/// Column list for `payments` queries.
const COLUMNS: &str = "\
    id, order_id, user_id, provider, provider_order_id, provider_payment_id, amount_paise, \
    currency, status, created_at, updated_at";

pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a payment attempt inside a caller-owned transaction.
    ///
    /// A captured payment replaces an earlier failed row for the same gateway
    /// payment ID. Returns `None` if the ID was already recorded otherwise.
    pub async fn insert(
        conn: &mut PgConnection,
        payment: &NewPayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments \
                 (order_id, user_id, provider, provider_order_id, provider_payment_id, \
                  amount_paise, currency, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (provider_payment_id) DO UPDATE SET status = EXCLUDED.status \
                 WHERE payments.status <> $9 AND EXCLUDED.status = $9 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(payment.order_id)
            .bind(payment.user_id)
            .bind(&payment.provider)
            .bind(&payment.provider_order_id)
            .bind(&payment.provider_payment_id)
            .bind(payment.amount_paise)
            .bind(&payment.currency)
            .bind(&payment.status)
            .bind(STATUS_CAPTURED)
            .fetch_optional(conn)
            .await
    }

    pub async fn list_for_order(pool: &PgPool, order_id: DbId) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE order_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// All payments, newest first, optionally filtered by status.
    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let (where_clause, param_idx) = match status {
            Some(_) => ("WHERE status = $1", 2),
            None => ("", 1),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM payments {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, Payment>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}
