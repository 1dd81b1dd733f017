//! Repository for the `cart_items` table.

use sqlx::PgPool;
use sweetbox_core::cart::Adjustment;
use sweetbox_core::types::{DbId, Paise};

use crate::models::cart::{CartItem, CartLineView};

/// Column list for `cart_items` queries.
const COLUMNS: &str = "id, user_id, product_id, quantity, unit_price_paise, created_at, updated_at";

pub struct CartRepo;

impl CartRepo {
    /// Raw lines for a user, oldest first.
    pub async fn list_lines(pool: &PgPool, user_id: DbId) -> Result<Vec<CartItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cart_items WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Lines joined with product details for display.
    pub async fn list_view(pool: &PgPool, user_id: DbId) -> Result<Vec<CartLineView>, sqlx::Error> {
        sqlx::query_as::<_, CartLineView>(
            "SELECT ci.product_id, p.name AS product_name, p.slug AS product_slug, p.image_url, \
                    p.category_id, ci.quantity, ci.unit_price_paise, \
                    (ci.unit_price_paise * ci.quantity)::BIGINT AS line_total_paise \
             FROM cart_items ci \
             JOIN products p ON p.id = ci.product_id \
             WHERE ci.user_id = $1 \
             ORDER BY ci.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_lines(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Insert or replace the quantity for one product, capturing its current price.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        quantity: i32,
        unit_price_paise: Paise,
    ) -> Result<CartItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO cart_items (user_id, product_id, quantity, unit_price_paise) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_id) DO UPDATE SET \
                 quantity = EXCLUDED.quantity, \
                 unit_price_paise = EXCLUDED.unit_price_paise \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price_paise)
            .fetch_one(pool)
            .await
    }

    /// Remove one product. Returns `true` if a line existed.
    pub async fn remove(pool: &PgPool, user_id: DbId, product_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Users that currently hold at least one cart line.
    pub async fn users_with_items(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT user_id FROM cart_items ORDER BY user_id")
            .fetch_all(pool)
            .await
    }

    /// Apply reconciliation adjustments for one user atomically.
    pub async fn apply_adjustments(
        pool: &PgPool,
        user_id: DbId,
        adjustments: &[Adjustment],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for adjustment in adjustments {
            match adjustment {
                Adjustment::PriceChanged {
                    product_id,
                    new_price_paise,
                    ..
                } => {
                    sqlx::query(
                        "UPDATE cart_items SET unit_price_paise = $3 \
                         WHERE user_id = $1 AND product_id = $2",
                    )
                    .bind(user_id)
                    .bind(product_id)
                    .bind(new_price_paise)
                    .execute(&mut *tx)
                    .await?;
                }
                Adjustment::Removed { product_id, .. } => {
                    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                        .bind(user_id)
                        .bind(product_id)
                        .execute(&mut *tx)
                        .await?;
                }
            }
        }
        tx.commit().await
    }
}
