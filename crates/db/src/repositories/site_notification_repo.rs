//! Repository for the `site_notifications` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::site_notification::{
    CreateSiteNotification, SiteNotification, UpdateSiteNotification,
};

/// Column list for `site_notifications` queries.
const COLUMNS: &str = "\
    id, title, message, kind, is_active, starts_at, expires_at, created_by, \
    created_at, updated_at";

pub struct SiteNotificationRepo;

impl SiteNotificationRepo {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SiteNotification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_notifications ORDER BY created_at DESC");
        sqlx::query_as::<_, SiteNotification>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active notifications that have started and not yet expired, newest first.
    pub async fn list_live(pool: &PgPool) -> Result<Vec<SiteNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM site_notifications \
             WHERE is_active \
               AND (starts_at IS NULL OR starts_at <= NOW()) \
               AND (expires_at IS NULL OR expires_at > NOW()) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SiteNotification>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SiteNotification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_notifications WHERE id = $1");
        sqlx::query_as::<_, SiteNotification>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        dto: &CreateSiteNotification,
        kind: &str,
        created_by: DbId,
    ) -> Result<SiteNotification, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_notifications \
                 (title, message, kind, is_active, starts_at, expires_at, created_by) \
             VALUES ($1, $2, $3, COALESCE($4, TRUE), $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteNotification>(&query)
            .bind(dto.title.trim())
            .bind(dto.message.trim())
            .bind(kind)
            .bind(dto.is_active)
            .bind(dto.starts_at)
            .bind(dto.expires_at)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateSiteNotification,
    ) -> Result<Option<SiteNotification>, sqlx::Error> {
        let query = format!(
            "UPDATE site_notifications SET \
                 title = COALESCE($2, title), \
                 message = COALESCE($3, message), \
                 kind = COALESCE($4, kind), \
                 is_active = COALESCE($5, is_active), \
                 starts_at = COALESCE($6, starts_at), \
                 expires_at = COALESCE($7, expires_at) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteNotification>(&query)
            .bind(id)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(dto.message.as_deref().map(str::trim))
            .bind(&dto.kind)
            .bind(dto.is_active)
            .bind(dto.starts_at)
            .bind(dto.expires_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM site_notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
