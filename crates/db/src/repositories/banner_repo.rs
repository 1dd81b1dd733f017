//! Repository for the `banners` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::banner::{Banner, CreateBanner, UpdateBanner};

/// Column list for `banners` queries.
const COLUMNS: &str = "\
    id, title, subtitle, media_url, media_type, link_url, sort_order, is_active, \
    starts_at, ends_at, created_at, updated_at";

pub struct BannerRepo;

impl BannerRepo {
    /// List every banner for the admin screen.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Banner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM banners ORDER BY sort_order, id");
        sqlx::query_as::<_, Banner>(&query).fetch_all(pool).await
    }

    /// Active banners whose display window contains the current time.
    pub async fn list_live(pool: &PgPool) -> Result<Vec<Banner>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM banners \
             WHERE is_active \
               AND (starts_at IS NULL OR starts_at <= NOW()) \
               AND (ends_at IS NULL OR ends_at > NOW()) \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Banner>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Banner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM banners WHERE id = $1");
        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        dto: &CreateBanner,
        media_type: &str,
    ) -> Result<Banner, sqlx::Error> {
        let query = format!(
            "INSERT INTO banners \
                 (title, subtitle, media_url, media_type, link_url, sort_order, is_active, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), COALESCE($7, TRUE), $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(dto.title.trim())
            .bind(&dto.subtitle)
            .bind(&dto.media_url)
            .bind(media_type)
            .bind(&dto.link_url)
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .bind(dto.starts_at)
            .bind(dto.ends_at)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateBanner,
    ) -> Result<Option<Banner>, sqlx::Error> {
        let query = format!(
            "UPDATE banners SET \
                 title = COALESCE($2, title), \
                 subtitle = COALESCE($3, subtitle), \
                 media_url = COALESCE($4, media_url), \
                 media_type = COALESCE($5, media_type), \
                 link_url = COALESCE($6, link_url), \
                 sort_order = COALESCE($7, sort_order), \
                 is_active = COALESCE($8, is_active), \
                 starts_at = COALESCE($9, starts_at), \
                 ends_at = COALESCE($10, ends_at) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .bind(dto.title.as_deref().map(str::trim))
            .bind(&dto.subtitle)
            .bind(&dto.media_url)
            .bind(&dto.media_type)
            .bind(&dto.link_url)
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .bind(dto.starts_at)
            .bind(dto.ends_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
