use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, instrument};

use vendorclub_analytics::{DailyRollup, DashboardStats, MonthWindow, day_bounds};
use vendorclub_core::{Money, WholesalerId};
use vendorclub_sales::OrderStatus;

use crate::db::StoreResult;
use crate::stores::{OrderStore, ProductStore, WholesalerStore};

#[derive(Debug, Clone)]
pub struct AnalyticsStore {
    pool: SqlitePool,
}

impl AnalyticsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Recompute one day's rollup from the orders table and store it.
    pub async fn refresh(&self, owner: WholesalerId, date: NaiveDate) -> StoreResult<DailyRollup> {
        let mut conn = self.pool.acquire().await?;
        refresh_rollup(&mut conn, owner, date).await
    }

    /// Most recent rollups, newest first.
    pub async fn recent(&self, owner: WholesalerId, limit: i64) -> StoreResult<Vec<DailyRollup>> {
        let rows: Vec<(NaiveDate, i64, i64, i64)> = sqlx::query_as(
            r#"
            SELECT date, total_orders, total_revenue, active_customers
            FROM analytics
            WHERE wholesaler_id = ?1
            ORDER BY date DESC
            LIMIT ?2
            "#,
        )
        .bind(owner.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(date, total_orders, total_revenue, active_customers)| DailyRollup {
                date,
                total_orders,
                total_revenue: Money::from_minor(total_revenue),
                active_customers,
            })
            .collect())
    }

    /// Headline dashboard figures as of `now`.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self, owner: WholesalerId, now: DateTime<Utc>) -> StoreResult<DashboardStats> {
        let orders = OrderStore::new(self.pool.clone());
        let month = MonthWindow::containing(now);

        let total_products = ProductStore::new(self.pool.clone()).count_for_wholesaler(owner).await?;
        let pending_orders = orders.count_with_status(owner, OrderStatus::Pending).await?;
        let month_revenue = orders.completed_revenue_between(owner, month.start, month.end).await?;
        let active_customers = orders.distinct_vendors_between(owner, month.start, month.end).await?;
        let scores = WholesalerStore::new(self.pool.clone()).scores(owner).await?;

        Ok(DashboardStats::new(
            total_products,
            pending_orders,
            month_revenue,
            active_customers,
            scores,
        ))
    }
}

/// Recompute and upsert one day's rollup on `conn`; order writes call this
/// inside their own transaction.
#[instrument(skip(conn))]
pub(crate) async fn refresh_rollup(
    conn: &mut SqliteConnection,
    owner: WholesalerId,
    date: NaiveDate,
) -> StoreResult<DailyRollup> {
    let (start, end) = day_bounds(date);
    let (total_orders, total_revenue, active_customers): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(total_amount), 0), COUNT(DISTINCT vendor_id)
        FROM orders
        WHERE wholesaler_id = ?1 AND created_at >= ?2 AND created_at < ?3
        "#,
    )
    .bind(owner.to_string())
    .bind(start)
    .bind(end)
    .fetch_one(&mut *conn)
    .await?;

    let rollup = DailyRollup {
        date,
        total_orders,
        total_revenue: Money::from_minor(total_revenue),
        active_customers,
    };

    sqlx::query(
        r#"
        INSERT INTO analytics (wholesaler_id, date, total_orders, total_revenue, active_customers)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (wholesaler_id, date) DO UPDATE SET
            total_orders = excluded.total_orders,
            total_revenue = excluded.total_revenue,
            active_customers = excluded.active_customers
        "#,
    )
    .bind(owner.to_string())
    .bind(rollup.date)
    .bind(rollup.total_orders)
    .bind(rollup.total_revenue.minor())
    .bind(rollup.active_customers)
    .execute(&mut *conn)
    .await?;

    debug!(total_orders, active_customers, "rollup refreshed");
    Ok(rollup)
}
