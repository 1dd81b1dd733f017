//! Repository for the `contacts` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::contact::{Contact, CreateContact};

/// Column list for `contacts` queries.
const COLUMNS: &str = "\
    id, name, email, phone, subject, message, status, admin_note, created_at, updated_at";

pub struct ContactRepo;

impl ContactRepo {
    /// Store a submission. The e-mail is expected to be normalized already.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateContact,
        email: &str,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, email, phone, subject, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(dto.name.trim())
            .bind(email)
            .bind(dto.phone.as_deref().map(str::trim))
            .bind(dto.subject.trim())
            .bind(dto.message.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE id = $1");
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List messages, newest first, optionally filtered by status.
    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        let (where_clause, param_idx) = match status {
            Some(_) => ("WHERE status = $1", 2),
            None => ("", 1),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM contacts {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );
        let mut q = sqlx::query_as::<_, Contact>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Set status and/or admin note.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        status: Option<&str>,
        admin_note: Option<&str>,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET \
                 status = COALESCE($2, status), \
                 admin_note = COALESCE($3, admin_note) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(id)
            .bind(status)
            .bind(admin_note)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
