//! Sample data for a fresh database.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use vendorclub_analytics::ROLLUP_HISTORY_DAYS;
use vendorclub_auth::hash_password;
use vendorclub_core::{ProductId, VendorId};
use vendorclub_parties::{NewVendor, NewWholesaler};
use vendorclub_products::{Product, ProductForm};
use vendorclub_reviews::{Reply, Review, ReviewDraft};
use vendorclub_sales::{Order, OrderRequest, OrderStatus};

use crate::Database;
use crate::stores::{
    WholesalerDocuments, approve_vendor, approve_wholesaler, insert_order, insert_product, insert_review,
    refresh_rollup, register_vendor, register_wholesaler,
};

const VENDORS: &[(&str, &str, &str, &str)] = &[
    ("Raj Patel", "raj@example.com", "9876543210", "Ghatkopar"),
    ("Priya Shah", "priya@example.com", "9876543211", "Ghatkopar"),
    ("Amit Kumar", "amit@example.com", "9876543212", "Ghatkopar"),
    ("Sunita Devi", "sunita@example.com", "9876543213", "Andheri"),
    ("Ravi Singh", "ravi@example.com", "9876543214", "Andheri"),
];

/// name, category, price, stock, views, likes
const PRODUCTS: &[(&str, &str, &str, &str, i64, i64)] = &[
    ("Organic Tomatoes", "Vegetables", "45", "500", 234, 12),
    ("Fresh Spinach", "Vegetables", "25", "200", 156, 8),
    ("Premium Carrots", "Vegetables", "35", "0", 89, 5),
    ("Red Onions", "Vegetables", "30", "300", 312, 18),
    ("Basmati Rice", "Grains & Cereals", "85", "150", 445, 25),
];

/// vendor index, product index, quantity, status
const ORDERS: &[(usize, usize, i64, OrderStatus)] = &[
    (0, 0, 50, OrderStatus::Pending),
    (1, 1, 30, OrderStatus::Completed),
    (2, 3, 25, OrderStatus::Pending),
    (3, 0, 40, OrderStatus::Processing),
    (4, 4, 20, OrderStatus::Completed),
    (0, 2, 35, OrderStatus::Pending),
    (1, 3, 15, OrderStatus::Pending),
    (4, 1, 10, OrderStatus::Processing),
];

/// vendor index, rating, comment, reply
const REVIEWS: &[(usize, i64, &str, Option<&str>)] = &[
    (0, 5, "Excellent quality vegetables, always fresh and delivered on time.", None),
    (1, 4, "Good products and reliable supplier. Competitive pricing.", Some("Thank you for your feedback!")),
    (2, 5, "Outstanding service! Best wholesaler in the area.", None),
    (3, 4, "Quality products, but delivery could be faster.", Some("We are working on improving delivery times.")),
];

pub const SAMPLE_VENDOR_PASSWORD: &str = "vendor123";
pub const SAMPLE_WHOLESALER_PASSWORD: &str = "password123";

/// Insert the sample data set unless the database already has vendors.
/// Everything is written in one transaction. Returns whether anything was
/// inserted.
pub async fn seed_sample_data(db: &Database, bcrypt_cost: u32, now: DateTime<Utc>) -> anyhow::Result<bool> {
    if db.vendors().count().await? > 0 {
        info!("database already populated, skipping sample data");
        return Ok(false);
    }

    let (vendor_hash, wholesaler_hash) = tokio::task::spawn_blocking(move || {
        Ok::<_, vendorclub_auth::PasswordError>((
            hash_password(SAMPLE_VENDOR_PASSWORD, bcrypt_cost)?,
            hash_password(SAMPLE_WHOLESALER_PASSWORD, bcrypt_cost)?,
        ))
    })
    .await
    .context("password hashing task failed")??;

    let mut tx = db.pool().begin().await?;

    let mut vendors: Vec<VendorId> = Vec::with_capacity(VENDORS.len());
    for (name, email, phone, location) in VENDORS {
        let signup = NewVendor {
            name: (*name).into(),
            email: (*email).into(),
            phone: (*phone).into(),
            password: SAMPLE_VENDOR_PASSWORD.into(),
            location: (*location).into(),
        }
        .validate()?;
        let vendor = register_vendor(&mut tx, signup, &vendor_hash, now).await?;
        approve_vendor(&mut tx, vendor.id).await?;
        vendors.push(vendor.id);
    }

    let registration = NewWholesaler {
        name: "Mumbai Fresh Mart".into(),
        phone: "9999999999".into(),
        password: SAMPLE_WHOLESALER_PASSWORD.into(),
        shop_name: "Fresh Mart Wholesale".into(),
        sourcing_info: "Quality products from local farms".into(),
        location: "Ghatkopar".into(),
    }
    .validate()?;
    let wholesaler =
        register_wholesaler(&mut tx, registration, &wholesaler_hash, WholesalerDocuments::default(), now).await?;
    approve_wholesaler(&mut tx, wholesaler.id).await?;

    let mut products: Vec<Product> = Vec::with_capacity(PRODUCTS.len());
    for (i, (name, category, price, stock, views, likes)) in PRODUCTS.iter().enumerate() {
        let draft = ProductForm {
            name: (*name).into(),
            main_category: Some((*category).into()),
            price: (*price).into(),
            stock: (*stock).into(),
            ..Default::default()
        }
        .validate()?;
        let created_at = now - Duration::minutes((PRODUCTS.len() - i) as i64);
        let mut product = Product::create(ProductId::new(), wholesaler.id, draft, None, created_at);
        product.views = *views;
        product.likes = *likes;
        insert_product(&mut tx, &product).await?;
        products.push(product);
    }

    // One order per day, the newest placed today.
    for (i, (vendor, product, quantity, status)) in ORDERS.iter().enumerate() {
        let product = &products[*product];
        let priced = OrderRequest { quantity: *quantity }.price(product.price)?;
        let created_at = now - Duration::days((ORDERS.len() - 1 - i) as i64);
        let mut order = Order::place(vendors[*vendor], wholesaler.id, product.id, priced, created_at);
        order.status = *status;
        insert_order(&mut tx, &order).await?;
    }

    for (i, (vendor, rating, comment, reply)) in REVIEWS.iter().enumerate() {
        let created_at = now - Duration::minutes((REVIEWS.len() - i) as i64);
        let mut review = Review::write(vendors[*vendor], ReviewDraft::new(wholesaler.id, *rating, comment)?, created_at);
        if let Some(reply) = reply {
            review.reply(wholesaler.id, Reply::parse(reply)?)?;
        }
        insert_review(&mut tx, &review).await?;
    }

    let today = now.date_naive();
    for days_back in 0..ROLLUP_HISTORY_DAYS {
        refresh_rollup(&mut tx, wholesaler.id, today - Duration::days(days_back)).await?;
    }

    tx.commit().await?;

    info!(
        vendors = vendors.len(),
        products = products.len(),
        orders = ORDERS.len(),
        reviews = REVIEWS.len(),
        "sample data inserted"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use vendorclub_auth::verify_password;
    use vendorclub_core::Money;
    use vendorclub_parties::Phone;
    use vendorclub_products::StockStatus;

    use super::*;
    use crate::db::test_support::{memory_db, wholesaler_with_product};

    #[tokio::test]
    async fn seeds_once_with_consistent_data() {
        let db = memory_db().await;
        let now = Utc::now();
        assert!(seed_sample_data(&db, 4, now).await.unwrap());
        assert!(!seed_sample_data(&db, 4, now).await.unwrap());
        assert_eq!(db.vendors().count().await.unwrap(), 5);

        let account = db
            .wholesalers()
            .login_account(&Phone::parse("9999999999").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(account.approved);
        assert!(verify_password(SAMPLE_WHOLESALER_PASSWORD, &account.password_hash));

        let products = db.products().for_wholesaler(account.id, None).await.unwrap();
        assert_eq!(products.len(), 5);
        for p in &products {
            assert_eq!(p.status, StockStatus::from_stock(p.stock), "{}", p.name);
        }

        let orders = db.orders().for_wholesaler(account.id).await.unwrap();
        assert_eq!(orders.len(), 8);
        for line in &orders {
            let product = products.iter().find(|p| p.id == line.order.product_id).unwrap();
            assert_eq!(Some(line.order.total_amount), product.price.times(line.order.quantity));
        }

        assert_eq!(db.reviews().for_wholesaler(account.id, None).await.unwrap().len(), 4);
        let rollups = db.analytics().recent(account.id, ROLLUP_HISTORY_DAYS).await.unwrap();
        assert_eq!(rollups.len(), 30);
        assert_eq!(rollups[0].date, now.date_naive());
        assert_eq!(rollups.iter().map(|r| r.total_orders).sum::<i64>(), 8);
        for rollup in &rollups {
            let on_day: Vec<_> = orders
                .iter()
                .filter(|line| line.order.rollup_date() == rollup.date)
                .collect();
            assert_eq!(rollup.total_orders, on_day.len() as i64, "{}", rollup.date);
            assert_eq!(
                Some(rollup.total_revenue),
                on_day.iter().map(|line| line.order.total_amount).sum::<Option<Money>>(),
                "{}",
                rollup.date
            );
        }
    }

    #[tokio::test]
    async fn failed_seed_leaves_nothing_behind() {
        let db = memory_db().await;
        // Takes the sample wholesaler's phone, so the seed fails after the vendors.
        let (owner, _) = wholesaler_with_product(&db).await;

        assert!(seed_sample_data(&db, 4, Utc::now()).await.is_err());
        assert_eq!(db.vendors().count().await.unwrap(), 0);
        assert_eq!(db.products().count_for_wholesaler(owner).await.unwrap(), 1);
        let (reviews,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(reviews, 0);
    }
}
