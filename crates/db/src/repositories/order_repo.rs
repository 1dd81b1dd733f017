//! Repository for the `orders` and `order_items` tables, including the
//! dispatch bookkeeping on order items.

use sqlx::{PgConnection, PgPool};
use sweetbox_core::dispatch::Allocation;
use sweetbox_core::order::{
    DISPATCHABLE_STATUSES, PAYMENT_FAILED, PAYMENT_PAID, PAYMENT_UNPAID, STATUS_CANCELLED,
    STATUS_CONFIRMED, STATUS_OUT_FOR_DELIVERY, STATUS_PENDING,
};
use sweetbox_core::types::DbId;

use crate::models::order::{
    DispatchRow, NewOrder, Order, OrderItem, OrderWithItems, OutstandingItemRow,
};
use crate::models::payment::NewPayment;
use crate::repositories::PaymentRepo;

/// Column list for `orders` queries.
const COLUMNS: &str = "\
    id, order_number, user_id, status, payment_status, hostel, room, phone, notes, \
    subtotal_paise, delivery_fee_paise, total_paise, gateway_order_id, created_at, updated_at";

/// Column list for `order_items` queries.
const ITEM_COLUMNS: &str = "\
    id, order_id, product_id, category_id, product_name, unit_price_paise, quantity, \
    dispatched_quantity, created_at, updated_at";

fn dispatchable_statuses() -> Vec<String> {
    DISPATCHABLE_STATUSES.iter().map(|s| s.to_string()).collect()
}

pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order and its item snapshots in one transaction.
    pub async fn create(pool: &PgPool, new: &NewOrder) -> Result<OrderWithItems, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO orders \
                 (order_number, user_id, hostel, room, phone, notes, \
                  subtotal_paise, delivery_fee_paise, total_paise) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(&new.order_number)
            .bind(new.user_id)
            .bind(&new.hostel)
            .bind(&new.room)
            .bind(&new.phone)
            .bind(&new.notes)
            .bind(new.subtotal_paise)
            .bind(new.delivery_fee_paise)
            .bind(new.total_paise)
            .fetch_one(&mut *tx)
            .await?;

        let item_query = format!(
            "INSERT INTO order_items \
                 (order_id, product_id, category_id, product_name, unit_price_paise, quantity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            let row = sqlx::query_as::<_, OrderItem>(&item_query)
                .bind(order.id)
                .bind(item.product_id)
                .bind(item.category_id)
                .bind(&item.product_name)
                .bind(item.unit_price_paise)
                .bind(item.quantity)
                .fetch_one(&mut *tx)
                .await?;
            items.push(row);
        }

        tx.commit().await?;
        Ok(OrderWithItems { order, items })
    }

    /// Attach the gateway's order reference to a freshly created order.
    pub async fn set_gateway_order_id(
        pool: &PgPool,
        id: DbId,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET gateway_order_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(gateway_order_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_gateway_order_id(
        pool: &PgPool,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE gateway_order_id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(gateway_order_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn items_for(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_with_items(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OrderWithItems>, sqlx::Error> {
        let Some(order) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let items = Self::items_for(pool, id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All orders with optional status and hostel filters, newest first.
    pub async fn list_filtered(
        pool: &PgPool,
        status: Option<&str>,
        hostel: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if status.is_some() {
            conditions.push(format!("status = ${param_idx}"));
            param_idx += 1;
        }
        if hostel.is_some() {
            conditions.push(format!("hostel = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM orders {where_clause} \
             ORDER BY created_at DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, Order>(&query);
        if let Some(s) = status {
            q = q.bind(s);
        }
        if let Some(h) = hostel {
            q = q.bind(h);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Move an order to `status` if it is still in `expected_status`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected_status: &str,
        status: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(expected_status)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Record a captured payment, confirm the order and empty the buyer's cart.
    ///
    /// All three happen in one transaction. Returns `None` when the order was
    /// no longer pending and unpaid (e.g. a repeated verification), in which
    /// case nothing is written.
    pub async fn confirm_payment(
        pool: &PgPool,
        order_id: DbId,
        payment: &NewPayment,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE orders SET status = $2, payment_status = $3 \
             WHERE id = $1 AND status = $4 AND payment_status <> $3 \
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(order_id)
            .bind(STATUS_CONFIRMED)
            .bind(PAYMENT_PAID)
            .bind(STATUS_PENDING)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(order) = order else {
            tx.rollback().await?;
            return Ok(None);
        };

        PaymentRepo::insert(&mut *tx, payment).await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    /// Record a failed payment attempt; the order stays pending so the
    /// buyer can retry.
    pub async fn record_failed_payment(
        pool: &PgPool,
        order_id: DbId,
        payment: &NewPayment,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        PaymentRepo::insert(&mut *tx, payment).await?;

        let query = format!(
            "UPDATE orders SET payment_status = $2 \
             WHERE id = $1 AND payment_status = $3 \
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(order_id)
            .bind(PAYMENT_FAILED)
            .bind(PAYMENT_UNPAID)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Cancel every unpaid pending order of a user. Used on account deletion.
    pub async fn cancel_unpaid_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE orders SET status = $2 \
             WHERE user_id = $1 AND status = $3 AND payment_status <> $4",
        )
        .bind(user_id)
        .bind(STATUS_CANCELLED)
        .bind(STATUS_PENDING)
        .bind(PAYMENT_PAID)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Outstanding units per hostel, category and product across
    /// dispatchable orders.
    pub async fn dispatch_summary(pool: &PgPool) -> Result<Vec<DispatchRow>, sqlx::Error> {
        sqlx::query_as::<_, DispatchRow>(
            "SELECT o.hostel, oi.category_id, c.name AS category_name, oi.product_id, \
                    MAX(oi.product_name) AS product_name, \
                    SUM(oi.quantity - oi.dispatched_quantity)::BIGINT AS pending_quantity, \
                    COUNT(DISTINCT o.id)::BIGINT AS order_count \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             LEFT JOIN categories c ON c.id = oi.category_id \
             WHERE o.status = ANY($1) AND oi.dispatched_quantity < oi.quantity \
             GROUP BY o.hostel, oi.category_id, c.name, oi.product_id \
             ORDER BY o.hostel, c.name, oi.product_id",
        )
        .bind(dispatchable_statuses())
        .fetch_all(pool)
        .await
    }

    /// Lock and return the outstanding items for one hostel and product,
    /// oldest order first.
    pub async fn lock_outstanding(
        conn: &mut PgConnection,
        hostel: &str,
        product_id: DbId,
    ) -> Result<Vec<OutstandingItemRow>, sqlx::Error> {
        sqlx::query_as::<_, OutstandingItemRow>(
            "SELECT oi.id AS order_item_id, oi.order_id, \
                    (oi.quantity - oi.dispatched_quantity) AS remaining \
             FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             WHERE o.hostel = $1 AND oi.product_id = $2 \
               AND o.status = ANY($3) AND oi.dispatched_quantity < oi.quantity \
             ORDER BY o.created_at, oi.id \
             FOR UPDATE OF oi",
        )
        .bind(hostel)
        .bind(product_id)
        .bind(dispatchable_statuses())
        .fetch_all(conn)
        .await
    }

    /// Add allocated units to each item's dispatched quantity.
    pub async fn apply_allocations(
        conn: &mut PgConnection,
        allocations: &[Allocation],
    ) -> Result<(), sqlx::Error> {
        for allocation in allocations {
            sqlx::query(
                "UPDATE order_items SET dispatched_quantity = dispatched_quantity + $2 \
                 WHERE id = $1",
            )
            .bind(allocation.order_item_id)
            .bind(allocation.quantity)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Move fully dispatched orders among `order_ids` to out-for-delivery.
    ///
    /// Returns the IDs of the orders that changed.
    pub async fn advance_fully_dispatched(
        conn: &mut PgConnection,
        order_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE orders o SET status = $2 \
             WHERE o.id = ANY($1) AND o.status = ANY($3) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM order_items oi \
                   WHERE oi.order_id = o.id AND oi.dispatched_quantity < oi.quantity) \
             RETURNING o.id",
        )
        .bind(order_ids)
        .bind(STATUS_OUT_FOR_DELIVERY)
        .bind(dispatchable_statuses())
        .fetch_all(conn)
        .await
    }
}
