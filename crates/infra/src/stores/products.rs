use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use vendorclub_core::{Money, ProductId, WholesalerId};
use vendorclub_products::{Product, StockStatus};

use crate::StoreError;
use crate::db::{StoreResult, parse_id};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    wholesaler_id: String,
    name: String,
    category: Option<String>,
    price: i64,
    stock: i64,
    status: String,
    group_buy_eligible: bool,
    image_path: Option<String>,
    views: i64,
    likes: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> StoreResult<Self> {
        let status = StockStatus::from_label(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown stock status '{}'", row.status)))?;
        Ok(Product {
            id: parse_id(&row.id)?,
            wholesaler_id: parse_id(&row.wholesaler_id)?,
            name: row.name,
            category: row.category,
            price: Money::from_minor(row.price),
            stock: row.stock,
            status,
            group_buy_eligible: row.group_buy_eligible,
            image_path: row.image_path,
            views: row.views,
            likes: row.likes,
            created_at: row.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, wholesaler_id, name, category, price, stock, status, \
     group_buy_eligible, image_path, views, likes, created_at";

fn into_products(rows: Vec<ProductRow>) -> StoreResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

#[derive(Debug, Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_product(&mut conn, product).await
    }

    pub async fn find(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Product::try_from).transpose()
    }

    /// A product only if it belongs to `owner`.
    pub async fn find_owned(&self, id: ProductId, owner: WholesalerId) -> StoreResult<Option<Product>> {
        Ok(self.find(id).await?.filter(|p| p.is_owned_by(owner)))
    }

    /// The wholesaler's products, newest first; `limit` caps the count.
    pub async fn for_wholesaler(
        &self,
        owner: WholesalerId,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE wholesaler_id = ?1 \
             ORDER BY created_at DESC, id DESC LIMIT ?2"
        ))
        .bind(owner.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;
        into_products(rows)
    }

    pub async fn count_for_wholesaler(&self, owner: WholesalerId) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE wholesaler_id = ?1")
            .bind(owner.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Persist an edited product (owner-scoped). Counters are left alone.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub async fn update(&self, product: &Product) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, category = ?2, price = ?3, stock = ?4, status = ?5, image_path = ?6
            WHERE id = ?7 AND wholesaler_id = ?8
            "#,
        )
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price.minor())
        .bind(product.stock)
        .bind(product.status.label())
        .bind(&product.image_path)
        .bind(product.id.to_string())
        .bind(product.wholesaler_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write a product's stock count and status label (owner-scoped).
    #[instrument(skip_all, fields(product_id = %product.id, stock = product.stock))]
    pub async fn set_stock(&self, product: &Product) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE products SET stock = ?1, status = ?2 WHERE id = ?3 AND wholesaler_id = ?4",
        )
        .bind(product.stock)
        .bind(product.status.label())
        .bind(product.id.to_string())
        .bind(product.wholesaler_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an owned product, returning its image path for cleanup.
    /// `None` when nothing was deleted.
    #[instrument(skip(self))]
    pub async fn delete_owned(
        &self,
        id: ProductId,
        owner: WholesalerId,
    ) -> StoreResult<Option<Option<String>>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "DELETE FROM products WHERE id = ?1 AND wholesaler_id = ?2 RETURNING image_path",
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(image,)| image))
    }

    pub async fn in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ?1 ORDER BY name"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        into_products(rows)
    }

    /// Substring match on name or category, ordered by name.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let pattern = format!("%{}%", escape_like(query.trim()));
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE ?1 ESCAPE '\\' OR category LIKE ?1 ESCAPE '\\' \
             ORDER BY name"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        into_products(rows)
    }

    /// Distinct non-empty categories across the catalog, sorted.
    pub async fn categories(&self) -> StoreResult<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT category FROM products \
             WHERE category IS NOT NULL AND category != '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Bump the view counter and return the product as now stored.
    pub async fn record_view(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET views = views + 1 WHERE id = ?1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Product::try_from).transpose()
    }

    /// Bump the like counter and return the new count.
    pub async fn like(&self, id: ProductId) -> StoreResult<Option<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE products SET likes = likes + 1 WHERE id = ?1 RETURNING likes")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(likes,)| likes))
    }
}

fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[instrument(skip_all, fields(product_id = %product.id, wholesaler_id = %product.wholesaler_id))]
pub(crate) async fn insert_product(conn: &mut SqliteConnection, product: &Product) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, wholesaler_id, name, category, price, stock, status,
            group_buy_eligible, image_path, views, likes, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(product.id.to_string())
    .bind(product.wholesaler_id.to_string())
    .bind(&product.name)
    .bind(&product.category)
    .bind(product.price.minor())
    .bind(product.stock)
    .bind(product.status.label())
    .bind(product.group_buy_eligible)
    .bind(&product.image_path)
    .bind(product.views)
    .bind(product.likes)
    .bind(product.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use vendorclub_parties::NewWholesaler;
    use vendorclub_products::ProductForm;

    use super::*;
    use crate::Database;
    use crate::db::test_support::memory_db;
    use crate::stores::WholesalerDocuments;

    async fn owner(db: &Database) -> WholesalerId {
        let registration = NewWholesaler {
            name: "Mumbai Fresh Mart".into(),
            phone: "9999999999".into(),
            password: "password123".into(),
            shop_name: "Fresh Mart Wholesale".into(),
            sourcing_info: String::new(),
            location: String::new(),
        }
        .validate()
        .unwrap();
        db.wholesalers()
            .register(registration, "hash", WholesalerDocuments::default(), Utc::now())
            .await
            .unwrap()
            .id
    }

    fn product(owner: WholesalerId, name: &str, category: &str, stock: &str, age_min: i64) -> Product {
        let draft = ProductForm {
            name: name.into(),
            main_category: Some(category.into()),
            price: "45".into(),
            stock: stock.into(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        Product::create(
            ProductId::new(),
            owner,
            draft,
            None,
            Utc::now() - Duration::minutes(age_min),
        )
    }

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let db = memory_db().await;
        let w = owner(&db).await;
        let store = db.products();
        let old = product(w, "Basmati Rice", "Grains & Cereals", "150", 10);
        let new = product(w, "Organic Tomatoes", "Vegetables", "500", 1);
        store.insert(&old).await.unwrap();
        store.insert(&new).await.unwrap();

        let listed = store.for_wholesaler(w, None).await.unwrap();
        assert_eq!(listed, vec![new.clone(), old]);
        assert_eq!(store.for_wholesaler(w, Some(1)).await.unwrap(), vec![new]);
        assert_eq!(store.count_for_wholesaler(w).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn stock_writes_are_owner_scoped() {
        let db = memory_db().await;
        let w = owner(&db).await;
        let store = db.products();
        let p = product(w, "Fresh Spinach", "Vegetables", "200", 0);
        store.insert(&p).await.unwrap();

        let mut foreign = p.clone();
        foreign.wholesaler_id = WholesalerId::new();
        foreign.set_stock(0).unwrap();
        assert!(!store.set_stock(&foreign).await.unwrap());

        let mut mine = p.clone();
        assert_eq!(mine.set_stock(0).unwrap(), StockStatus::OutOfStock);
        assert!(store.set_stock(&mine).await.unwrap());
        let loaded = store.find(p.id).await.unwrap().unwrap();
        assert_eq!((loaded.stock, loaded.status), (0, StockStatus::OutOfStock));
    }

    #[tokio::test]
    async fn search_matches_name_or_category() {
        let db = memory_db().await;
        let w = owner(&db).await;
        let store = db.products();
        store.insert(&product(w, "Red Onions", "Vegetables", "300", 0)).await.unwrap();
        store.insert(&product(w, "Basmati Rice", "Grains & Cereals", "150", 0)).await.unwrap();
        store.insert(&product(w, "Premium Carrots", "Vegetables", "0", 0)).await.unwrap();

        let names = |ps: Vec<Product>| ps.into_iter().map(|p| p.name).collect::<Vec<_>>();
        assert_eq!(names(store.search("rice").await.unwrap()), vec!["Basmati Rice"]);
        assert_eq!(
            names(store.search("veget").await.unwrap()),
            vec!["Premium Carrots", "Red Onions"]
        );
        assert!(store.search("100%").await.unwrap().is_empty());
        assert_eq!(
            store.categories().await.unwrap(),
            vec!["Grains & Cereals".to_string(), "Vegetables".to_string()]
        );
    }

    #[tokio::test]
    async fn views_and_likes_increment() {
        let db = memory_db().await;
        let w = owner(&db).await;
        let store = db.products();
        let p = product(w, "Red Onions", "Vegetables", "300", 0);
        store.insert(&p).await.unwrap();

        assert_eq!(store.record_view(p.id).await.unwrap().unwrap().views, 1);
        assert_eq!(store.like(p.id).await.unwrap(), Some(1));
        assert_eq!(store.like(p.id).await.unwrap(), Some(2));
        assert_eq!(store.like(ProductId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_returns_image_and_respects_owner() {
        let db = memory_db().await;
        let w = owner(&db).await;
        let store = db.products();
        let mut p = product(w, "Red Onions", "Vegetables", "300", 0);
        p.image_path = Some("uploads/product_x_onion.png".into());
        store.insert(&p).await.unwrap();

        assert_eq!(store.delete_owned(p.id, WholesalerId::new()).await.unwrap(), None);
        assert_eq!(
            store.delete_owned(p.id, w).await.unwrap(),
            Some(Some("uploads/product_x_onion.png".into()))
        );
        assert!(store.find(p.id).await.unwrap().is_none());
    }
}
