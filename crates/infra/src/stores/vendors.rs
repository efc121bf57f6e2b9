use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use vendorclub_core::VendorId;
use vendorclub_parties::{LoginAccount, Phone, ValidVendorSignup, Vendor};

use crate::db::{StoreResult, parse_id};

#[derive(sqlx::FromRow)]
struct VendorRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    location: String,
    approved: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = crate::StoreError;

    fn try_from(row: VendorRow) -> StoreResult<Self> {
        Ok(Vendor {
            id: parse_id(&row.id)?,
            name: row.name,
            email: row.email,
            phone: Phone::parse(&row.phone)?,
            location: row.location,
            approved: row.approved,
            created_at: row.created_at,
        })
    }
}

const VENDOR_COLUMNS: &str = "id, name, email, phone, location, approved, created_at";

#[derive(Debug, Clone)]
pub struct VendorStore {
    pool: SqlitePool,
}

impl VendorStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new, unapproved vendor. A taken phone is a `Conflict`.
    pub async fn register(
        &self,
        signup: ValidVendorSignup,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Vendor> {
        let mut conn = self.pool.acquire().await?;
        register_vendor(&mut conn, signup, password_hash, now).await
    }

    pub async fn find(&self, id: VendorId) -> StoreResult<Option<Vendor>> {
        let row: Option<VendorRow> =
            sqlx::query_as(&format!("SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = ?1"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Vendor::try_from).transpose()
    }

    /// Credentials for a login attempt by phone.
    pub async fn login_account(&self, phone: &Phone) -> StoreResult<Option<LoginAccount<VendorId>>> {
        let row: Option<(String, String, String, bool)> = sqlx::query_as(
            "SELECT id, name, password_hash, approved FROM vendors WHERE phone = ?1",
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, name, password_hash, approved)| {
            Ok(LoginAccount {
                id: parse_id(&id)?,
                name,
                password_hash,
                approved,
            })
        })
        .transpose()
    }

    pub async fn pending(&self) -> StoreResult<Vec<Vendor>> {
        let rows: Vec<VendorRow> = sqlx::query_as(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE approved = 0 ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Vendor::try_from).collect()
    }

    /// Returns false when no vendor has this id.
    pub async fn approve(&self, id: VendorId) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        approve_vendor(&mut conn, id).await
    }

    /// Delete a pending vendor. Returns false when no pending vendor has this id.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: VendorId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?1 AND approved = 0")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vendors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[instrument(skip_all, fields(phone = %signup.phone.as_str()))]
pub(crate) async fn register_vendor(
    conn: &mut SqliteConnection,
    signup: ValidVendorSignup,
    password_hash: &str,
    now: DateTime<Utc>,
) -> StoreResult<Vendor> {
    let vendor = Vendor {
        id: VendorId::new(),
        name: signup.name,
        email: signup.email,
        phone: signup.phone,
        location: signup.location,
        approved: false,
        created_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO vendors (id, name, email, phone, password_hash, location, approved, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)
        "#,
    )
    .bind(vendor.id.to_string())
    .bind(&vendor.name)
    .bind(&vendor.email)
    .bind(vendor.phone.as_str())
    .bind(password_hash)
    .bind(&vendor.location)
    .bind(vendor.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(vendor)
}

#[instrument(skip(conn))]
pub(crate) async fn approve_vendor(conn: &mut SqliteConnection, id: VendorId) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE vendors SET approved = 1 WHERE id = ?1")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
