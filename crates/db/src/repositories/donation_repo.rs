//! Repository for the `donations` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::donation::{CreateDonation, Donation};

/// Column list for `donations` queries.
const COLUMNS: &str = "\
    id, user_id, donor_name, donor_email, amount_paise, message, status, admin_note, \
    created_at, updated_at";

pub struct DonationRepo;

impl DonationRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        dto: &CreateDonation,
        donor_email: &str,
    ) -> Result<Donation, sqlx::Error> {
        let query = format!(
            "INSERT INTO donations (user_id, donor_name, donor_email, amount_paise, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(user_id)
            .bind(dto.donor_name.trim())
            .bind(donor_email)
            .bind(dto.amount_paise)
            .bind(dto.message.as_deref().map(str::trim))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's own pledges, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let (where_clause, param_idx) = match status {
            Some(_) => ("WHERE status = $1", 2),
            None => ("", 1),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM donations {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, Donation>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Move a pledge to `status`, but only if it is still in `expected_status`.
    ///
    /// Returns `None` when the row is missing or changed concurrently.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        status: &str,
        admin_note: Option<&str>,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!(
            "UPDATE donations SET status = $3, admin_note = COALESCE($4, admin_note) \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .bind(expected_status)
            .bind(status)
            .bind(admin_note)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
