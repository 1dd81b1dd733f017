//! Repository for the `products` table.

use sqlx::PgPool;
use sweetbox_core::types::DbId;

use crate::models::product::{CreateProduct, Product, UpdateProduct};

/// Column list for `products` queries. Every query joins `categories c`.
const COLUMNS: &str = "\
    p.id, p.category_id, p.name, p.slug, p.description, p.price_paise, p.image_url, \
    p.is_available, p.is_active, c.is_active AS category_is_active, p.created_at, p.updated_at";

const FROM_JOINED: &str = "products p JOIN categories c ON c.id = p.category_id";

pub struct ProductRepo;

impl ProductRepo {
    /// List products with optional category-slug and name filters.
    ///
    /// Inactive products and products in inactive categories are hidden
    /// unless `include_inactive` is set.
    pub async fn list_filtered(
        pool: &PgPool,
        category_slug: Option<&str>,
        search: Option<&str>,
        include_inactive: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if !include_inactive {
            conditions.push("p.is_active AND c.is_active".to_string());
        }
        if category_slug.is_some() {
            conditions.push(format!("c.slug = ${param_idx}"));
            param_idx += 1;
        }
        if search.is_some() {
            conditions.push(format!("p.name ILIKE ${param_idx} ESCAPE '\\'"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             {where_clause} \
             ORDER BY c.sort_order, c.name, p.name \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Product>(&query);
        if let Some(slug) = category_slug {
            q = q.bind(slug);
        }
        if let Some(s) = search {
            q = q.bind(super::contains_pattern(s));
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE p.id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a publicly visible product (active, in an active category) by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} WHERE p.slug = $1 AND p.is_active AND c.is_active"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several products by ID in one round trip.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE p.id = ANY($1)");
        sqlx::query_as::<_, Product>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Active products in active categories, for the sitemap.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             WHERE p.is_active AND c.is_active \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, Product>(&query).fetch_all(pool).await
    }

    pub async fn create(
        pool: &PgPool,
        dto: &CreateProduct,
        slug: &str,
    ) -> Result<Product, sqlx::Error> {
        let query = format!(
            "WITH p AS ( \
                 INSERT INTO products \
                     (category_id, name, slug, description, price_paise, image_url, is_available) \
                 VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, TRUE)) \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM p JOIN categories c ON c.id = p.category_id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(dto.category_id)
            .bind(dto.name.trim())
            .bind(slug)
            .bind(&dto.description)
            .bind(dto.price_paise)
            .bind(&dto.image_url)
            .bind(dto.is_available)
            .fetch_one(pool)
            .await
    }

    /// Partially update a product. `slug` must accompany a new name.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateProduct,
        slug: Option<&str>,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "WITH p AS ( \
                 UPDATE products SET \
                     category_id = COALESCE($2, category_id), \
                     name = COALESCE($3, name), \
                     slug = COALESCE($4, slug), \
                     description = COALESCE($5, description), \
                     price_paise = COALESCE($6, price_paise), \
                     image_url = COALESCE($7, image_url), \
                     is_available = COALESCE($8, is_available), \
                     is_active = COALESCE($9, is_active) \
                 WHERE id = $1 \
                 RETURNING * \
             ) \
             SELECT {COLUMNS} FROM p JOIN categories c ON c.id = p.category_id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(dto.category_id)
            .bind(dto.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(&dto.description)
            .bind(dto.price_paise)
            .bind(&dto.image_url)
            .bind(dto.is_available)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a product. Returns `true` if it was active.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE products SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
