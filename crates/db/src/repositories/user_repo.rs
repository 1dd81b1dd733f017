//! Repository for the `users` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::user::{UpdateProfile, UpsertIdentity, User};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, external_uid, email, name, phone, hostel, room, role, \
    deleted_at, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user on first sign-in, or refresh identity fields on later ones.
    ///
    /// A blank `name` never overwrites a stored one. Soft-deleted rows are
    /// returned unchanged apart from the refresh; callers decide whether to
    /// reject them.
    pub async fn upsert_identity(
        pool: &PgPool,
        identity: &UpsertIdentity,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_uid, email, name, phone) \
             VALUES ($1, $2, COALESCE($3, ''), $4) \
             ON CONFLICT (external_uid) DO UPDATE SET \
                 email = EXCLUDED.email, \
                 name = CASE WHEN EXCLUDED.name = '' THEN users.name ELSE EXCLUDED.name END, \
                 phone = COALESCE(EXCLUDED.phone, users.phone) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&identity.external_uid)
            .bind(&identity.email)
            .bind(&identity.name)
            .bind(&identity.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID, including soft-deleted users.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active (not deleted) user by ID.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partially update profile fields of an active user.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 phone = COALESCE($3, phone), \
                 hostel = COALESCE($4, hostel), \
                 room = COALESCE($5, room) \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.phone)
            .bind(&dto.hostel)
            .bind(&dto.room)
            .fetch_optional(pool)
            .await
    }

    /// Change a user's role.
    pub async fn set_role(pool: &PgPool, id: DbId, role: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2 WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// List users, newest first, with an optional name/email search.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        include_deleted: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if !include_deleted {
            conditions.push("deleted_at IS NULL".to_string());
        }
        if search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${param_idx} ESCAPE '\\' OR email ILIKE ${param_idx} ESCAPE '\\')"
            ));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM users {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(s) = search {
            q = q.bind(super::contains_pattern(s));
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Soft-delete a user. Returns `true` if the row was active.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
