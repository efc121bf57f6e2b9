//! SQLite connection pool, schema setup and the store error type.

mod schema;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tracing::{info, instrument};

use vendorclub_core::DomainError;

use crate::stores::{
    AnalyticsStore, OrderStore, ProductStore, ReviewStore, VendorStore, WholesalerStore,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. phone already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be turned back into a domain value.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict(db.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Parse a TEXT column back into a typed id.
pub(crate) fn parse_id<T>(raw: &str) -> StoreResult<T>
where
    T: FromStr<Err = DomainError>,
{
    Ok(raw.parse()?)
}

/// Handle to the database; cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool and create any missing tables.
    ///
    /// An in-memory URL gets a single never-recycled connection, since every
    /// SQLite memory connection is its own database.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(8)
                .acquire_timeout(Duration::from_secs(5))
        };

        let pool = pool_options.connect_with(options).await?;
        let db = Self { pool };
        db.migrate().await?;
        info!("database ready");
        Ok(db)
    }

    async fn migrate(&self) -> StoreResult<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn vendors(&self) -> VendorStore {
        VendorStore::new(self.pool.clone())
    }

    pub fn wholesalers(&self) -> WholesalerStore {
        WholesalerStore::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductStore {
        ProductStore::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderStore {
        OrderStore::new(self.pool.clone())
    }

    pub fn reviews(&self) -> ReviewStore {
        ReviewStore::new(self.pool.clone())
    }

    pub fn analytics(&self) -> AnalyticsStore {
        AnalyticsStore::new(self.pool.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use vendorclub_core::{ProductId, VendorId, WholesalerId};
    use vendorclub_parties::{NewVendor, NewWholesaler};
    use vendorclub_products::{Product, ProductForm};

    use super::Database;
    use crate::stores::WholesalerDocuments;

    pub(crate) async fn memory_db() -> Database {
        Database::connect("sqlite::memory:").await.unwrap()
    }

    /// An approved vendor named "Raj Patel".
    pub(crate) async fn vendor(db: &Database, phone: &str) -> VendorId {
        let signup = NewVendor {
            name: "Raj Patel".into(),
            email: "raj@example.com".into(),
            phone: phone.into(),
            password: "vendor123".into(),
            location: "Ghatkopar".into(),
        }
        .validate()
        .unwrap();
        let vendor = db.vendors().register(signup, "hash", Utc::now()).await.unwrap();
        db.vendors().approve(vendor.id).await.unwrap();
        vendor.id
    }

    /// An approved wholesaler (phone 9999999999) owning one in-stock product.
    pub(crate) async fn wholesaler_with_product(db: &Database) -> (WholesalerId, Product) {
        let registration = NewWholesaler {
            name: "Mumbai Fresh Mart".into(),
            phone: "9999999999".into(),
            password: "password123".into(),
            shop_name: "Fresh Mart Wholesale".into(),
            sourcing_info: String::new(),
            location: "Ghatkopar".into(),
        }
        .validate()
        .unwrap();
        let wholesaler = db
            .wholesalers()
            .register(registration, "hash", WholesalerDocuments::default(), Utc::now())
            .await
            .unwrap();
        db.wholesalers().approve(wholesaler.id).await.unwrap();

        let draft = ProductForm {
            name: "Organic Tomatoes".into(),
            main_category: Some("Vegetables".into()),
            price: "45".into(),
            stock: "500".into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let product = Product::create(ProductId::new(), wholesaler.id, draft, None, Utc::now());
        db.products().insert(&product).await.unwrap();
        (wholesaler.id, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_is_idempotent() {
        let db = test_support::memory_db().await;
        db.migrate().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('vendors', 'wholesalers', 'products', 'orders', 'reviews', 'analytics')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 6);
    }
}
