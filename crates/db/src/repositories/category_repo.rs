//! Repository for the `categories` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// Column list for `categories` queries.
const COLUMNS: &str = "\
    id, name, slug, description, image_url, sort_order, is_active, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// List categories ordered for display.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Category>, sqlx::Error> {
        let filter = if include_inactive { "" } else { "WHERE is_active" };
        let query = format!("SELECT {COLUMNS} FROM categories {filter} ORDER BY sort_order, name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1 AND is_active");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        dto: &CreateCategory,
        slug: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description, image_url, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, TRUE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(dto.name.trim())
            .bind(slug)
            .bind(&dto.description)
            .bind(&dto.image_url)
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .fetch_one(pool)
            .await
    }

    /// Partially update a category. `slug` must accompany a new name.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateCategory,
        slug: Option<&str>,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                 name = COALESCE($2, name), \
                 slug = COALESCE($3, slug), \
                 description = COALESCE($4, description), \
                 image_url = COALESCE($5, image_url), \
                 sort_order = COALESCE($6, sort_order), \
                 is_active = COALESCE($7, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(dto.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(&dto.description)
            .bind(&dto.image_url)
            .bind(dto.sort_order)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Number of products (active or not) that reference the category.
    pub async fn count_products(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Hard-delete a category. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
