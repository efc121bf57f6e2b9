use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use vendorclub_analytics::DailyRollup;
use vendorclub_core::{Money, OrderId, VendorId, WholesalerId};
use vendorclub_sales::{Order, OrderStatus};

use crate::StoreError;
use crate::db::{StoreResult, parse_id};
use crate::stores::analytics::refresh_rollup;

/// A wholesaler's view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WholesalerOrderLine {
    #[serde(flatten)]
    pub order: Order,
    pub vendor_name: String,
    /// `None` once the product has been deleted.
    pub product_name: Option<String>,
}

/// A vendor's view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorOrderLine {
    #[serde(flatten)]
    pub order: Order,
    pub product_name: Option<String>,
    pub product_price: Option<Money>,
    pub product_category: Option<String>,
    pub wholesaler_name: String,
    pub wholesaler_phone: String,
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    wholesaler_id: String,
    vendor_id: String,
    product_id: String,
    quantity: i64,
    total_amount: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> StoreResult<Self> {
        Ok(Order {
            id: parse_id(&row.id)?,
            wholesaler_id: parse_id(&row.wholesaler_id)?,
            vendor_id: parse_id(&row.vendor_id)?,
            product_id: parse_id(&row.product_id)?,
            quantity: row.quantity,
            total_amount: Money::from_minor(row.total_amount),
            status: OrderStatus::parse(&row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WholesalerOrderRow {
    #[sqlx(flatten)]
    order: OrderRow,
    vendor_name: String,
    product_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct VendorOrderRow {
    #[sqlx(flatten)]
    order: OrderRow,
    product_name: Option<String>,
    product_price: Option<i64>,
    product_category: Option<String>,
    wholesaler_name: String,
    wholesaler_phone: String,
}

const ORDER_COLUMNS: &str =
    "o.id, o.wholesaler_id, o.vendor_id, o.product_id, o.quantity, o.total_amount, o.status, o.created_at";

#[derive(Debug, Clone)]
pub struct OrderStore {
    pool: SqlitePool,
}

impl OrderStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store an order without touching the rollups.
    pub async fn insert(&self, order: &Order) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_order(&mut conn, order).await
    }

    /// Store a new order and refresh its wholesaler's rollup for the order's
    /// day in the same transaction.
    #[instrument(skip_all, fields(order_id = %order.id, wholesaler_id = %order.wholesaler_id))]
    pub async fn place(&self, order: &Order) -> StoreResult<DailyRollup> {
        let mut tx = self.pool.begin().await?;
        insert_order(&mut tx, order).await?;
        let rollup = refresh_rollup(&mut tx, order.wholesaler_id, order.rollup_date()).await?;
        tx.commit().await?;
        Ok(rollup)
    }

    /// Set the status of an order the wholesaler owns and refresh the rollup
    /// for its day, atomically. `None` when the order is not theirs.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        owner: WholesalerId,
        status: OrderStatus,
    ) -> StoreResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;
        let row: Option<OrderRow> = sqlx::query_as(
            "UPDATE orders SET status = ?1 WHERE id = ?2 AND wholesaler_id = ?3 \
             RETURNING id, wholesaler_id, vendor_id, product_id, quantity, total_amount, status, created_at",
        )
        .bind(status.as_str())
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order) = row.map(Order::try_from).transpose()? else {
            return Ok(None);
        };
        refresh_rollup(&mut tx, owner, order.rollup_date()).await?;
        tx.commit().await?;
        Ok(Some(order))
    }

    /// All of a wholesaler's orders with vendor and product names, newest first.
    pub async fn for_wholesaler(&self, owner: WholesalerId) -> StoreResult<Vec<WholesalerOrderLine>> {
        let rows: Vec<WholesalerOrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ORDER_COLUMNS}, v.name AS vendor_name, p.name AS product_name
            FROM orders o
            JOIN vendors v ON v.id = o.vendor_id
            LEFT JOIN products p ON p.id = o.product_id
            WHERE o.wholesaler_id = ?1
            ORDER BY o.created_at DESC, o.id DESC
            "#
        ))
        .bind(owner.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(WholesalerOrderLine {
                    order: row.order.try_into()?,
                    vendor_name: row.vendor_name,
                    product_name: row.product_name,
                })
            })
            .collect()
    }

    /// A vendor's orders with product and wholesaler details, newest first.
    pub async fn for_vendor(
        &self,
        vendor: VendorId,
        limit: Option<i64>,
    ) -> StoreResult<Vec<VendorOrderLine>> {
        let rows: Vec<VendorOrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {ORDER_COLUMNS},
                   p.name AS product_name, p.price AS product_price, p.category AS product_category,
                   w.name AS wholesaler_name, w.phone AS wholesaler_phone
            FROM orders o
            JOIN wholesalers w ON w.id = o.wholesaler_id
            LEFT JOIN products p ON p.id = o.product_id
            WHERE o.vendor_id = ?1
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT ?2
            "#
        ))
        .bind(vendor.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(VendorOrderLine {
                    order: row.order.try_into()?,
                    product_name: row.product_name,
                    product_price: row.product_price.map(Money::from_minor),
                    product_category: row.product_category,
                    wholesaler_name: row.wholesaler_name,
                    wholesaler_phone: row.wholesaler_phone,
                })
            })
            .collect()
    }

    pub async fn count_with_status(&self, owner: WholesalerId, status: OrderStatus) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM orders WHERE wholesaler_id = ?1 AND status = ?2")
                .bind(owner.to_string())
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Sum of completed orders created in `[start, end)`.
    pub async fn completed_revenue_between(
        &self,
        owner: WholesalerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Money> {
        let (sum,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders \
             WHERE wholesaler_id = ?1 AND status = 'completed' \
             AND created_at >= ?2 AND created_at < ?3",
        )
        .bind(owner.to_string())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(Money::from_minor(sum))
    }

    /// Distinct vendors with an order created in `[start, end)`.
    pub async fn distinct_vendors_between(
        &self,
        owner: WholesalerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT vendor_id) FROM orders \
             WHERE wholesaler_id = ?1 AND created_at >= ?2 AND created_at < ?3",
        )
        .bind(owner.to_string())
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[instrument(skip_all, fields(order_id = %order.id, wholesaler_id = %order.wholesaler_id))]
pub(crate) async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (id, wholesaler_id, vendor_id, product_id, quantity, total_amount, status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(order.id.to_string())
    .bind(order.wholesaler_id.to_string())
    .bind(order.vendor_id.to_string())
    .bind(order.product_id.to_string())
    .bind(order.quantity)
    .bind(order.total_amount.minor())
    .bind(order.status.as_str())
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::db::test_support::memory_db;
    use crate::db::test_support::{vendor, wholesaler_with_product};
    use vendorclub_sales::OrderRequest;

    #[tokio::test]
    async fn status_update_is_owner_scoped() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let priced = OrderRequest { quantity: 3 }.price(product.price).unwrap();
        let order = Order::place(v, w, product.id, priced, Utc::now());
        db.orders().insert(&order).await.unwrap();

        let store = db.orders();
        assert!(store
            .set_status(order.id, WholesalerId::new(), OrderStatus::Completed)
            .await
            .unwrap()
            .is_none());
        let updated = store
            .set_status(order.id, w, OrderStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(store.count_with_status(w, OrderStatus::Pending).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn listings_join_names_and_survive_product_deletion() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let priced = OrderRequest { quantity: 2 }.price(product.price).unwrap();
        db.orders().insert(&Order::place(v, w, product.id, priced, Utc::now())).await.unwrap();

        let lines = db.orders().for_wholesaler(w).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].vendor_name, "Raj Patel");
        assert_eq!(lines[0].product_name.as_deref(), Some(product.name.as_str()));

        let vendor_lines = db.orders().for_vendor(v, Some(5)).await.unwrap();
        assert_eq!(vendor_lines[0].wholesaler_phone, "9999999999");
        assert_eq!(vendor_lines[0].product_price, Some(product.price));

        db.products().delete_owned(product.id, w).await.unwrap();
        let lines = db.orders().for_wholesaler(w).await.unwrap();
        assert_eq!(lines[0].product_name, None);
    }

    #[tokio::test]
    async fn month_figures_count_only_the_window() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let (a, b) = (vendor(&db, "9876543210").await, vendor(&db, "9876543211").await);
        let now = Utc::now();
        let store = db.orders();

        let place = |v, qty, at| {
            let priced = OrderRequest { quantity: qty }.price(product.price).unwrap();
            Order::place(v, w, product.id, priced, at)
        };
        let done = place(a, 2, now);
        store.insert(&done).await.unwrap();
        store.set_status(done.id, w, OrderStatus::Completed).await.unwrap();
        store.insert(&place(b, 1, now)).await.unwrap();
        let old = place(b, 10, now - Duration::days(90));
        store.insert(&old).await.unwrap();
        store.set_status(old.id, w, OrderStatus::Completed).await.unwrap();

        let (start, end) = (now - Duration::days(1), now + Duration::days(1));
        assert_eq!(
            store.completed_revenue_between(w, start, end).await.unwrap(),
            done.total_amount
        );
        assert_eq!(store.distinct_vendors_between(w, start, end).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn placing_refreshes_the_day_rollup() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let priced = OrderRequest { quantity: 3 }.price(product.price).unwrap();
        let order = Order::place(v, w, product.id, priced, Utc::now());

        let rollup = db.orders().place(&order).await.unwrap();
        assert_eq!((rollup.total_orders, rollup.total_revenue), (1, order.total_amount));
        assert_eq!(db.analytics().recent(w, 30).await.unwrap(), vec![rollup]);
    }

    async fn order_count(db: &crate::Database) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(db.pool())
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn failed_rollup_rolls_back_the_order() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let priced = OrderRequest { quantity: 3 }.price(product.price).unwrap();
        let order = Order::place(v, w, product.id, priced, Utc::now());
        sqlx::query("DROP TABLE analytics").execute(db.pool()).await.unwrap();

        assert!(db.orders().place(&order).await.is_err());
        assert_eq!(order_count(&db).await, 0);
    }

    #[tokio::test]
    async fn failed_rollup_keeps_the_previous_status() {
        let db = memory_db().await;
        let (w, product) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let priced = OrderRequest { quantity: 3 }.price(product.price).unwrap();
        let order = Order::place(v, w, product.id, priced, Utc::now());
        db.orders().place(&order).await.unwrap();
        sqlx::query("DROP TABLE analytics").execute(db.pool()).await.unwrap();

        assert!(db.orders().set_status(order.id, w, OrderStatus::Completed).await.is_err());
        assert_eq!(db.orders().count_with_status(w, OrderStatus::Pending).await.unwrap(), 1);
    }
}
