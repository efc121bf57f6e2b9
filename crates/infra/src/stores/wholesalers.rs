use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use vendorclub_core::WholesalerId;
use vendorclub_parties::{
    LoginAccount, PerformanceScores, Phone, ProfileUpdate, ValidWholesalerRegistration, Wholesaler,
};

use crate::db::{StoreResult, parse_id};

/// Stored paths of the documents uploaded with a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WholesalerDocuments {
    pub id_doc_path: Option<String>,
    pub license_doc_path: Option<String>,
}

#[derive(sqlx::FromRow)]
struct WholesalerRow {
    id: String,
    name: String,
    phone: String,
    shop_name: String,
    sourcing_info: String,
    location: String,
    id_doc_path: Option<String>,
    license_doc_path: Option<String>,
    profile_photo: Option<String>,
    approved: bool,
    trust_score: f64,
    response_rate: f64,
    delivery_rate: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<WholesalerRow> for Wholesaler {
    type Error = crate::StoreError;

    fn try_from(row: WholesalerRow) -> StoreResult<Self> {
        Ok(Wholesaler {
            id: parse_id(&row.id)?,
            name: row.name,
            phone: Phone::parse(&row.phone)?,
            shop_name: row.shop_name,
            sourcing_info: row.sourcing_info,
            location: row.location,
            id_doc_path: row.id_doc_path,
            license_doc_path: row.license_doc_path,
            profile_photo: row.profile_photo,
            approved: row.approved,
            scores: PerformanceScores {
                trust_score: row.trust_score,
                response_rate: row.response_rate,
                delivery_rate: row.delivery_rate,
            },
            created_at: row.created_at,
        })
    }
}

const WHOLESALER_COLUMNS: &str = "id, name, phone, shop_name, sourcing_info, location, \
     id_doc_path, license_doc_path, profile_photo, approved, \
     trust_score, response_rate, delivery_rate, created_at";

#[derive(Debug, Clone)]
pub struct WholesalerStore {
    pool: SqlitePool,
}

impl WholesalerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new, unapproved wholesaler with default scores.
    pub async fn register(
        &self,
        registration: ValidWholesalerRegistration,
        password_hash: &str,
        documents: WholesalerDocuments,
        now: DateTime<Utc>,
    ) -> StoreResult<Wholesaler> {
        let mut conn = self.pool.acquire().await?;
        register_wholesaler(&mut conn, registration, password_hash, documents, now).await
    }

    pub async fn find(&self, id: WholesalerId) -> StoreResult<Option<Wholesaler>> {
        let row: Option<WholesalerRow> = sqlx::query_as(&format!(
            "SELECT {WHOLESALER_COLUMNS} FROM wholesalers WHERE id = ?1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Wholesaler::try_from).transpose()
    }

    pub async fn exists(&self, id: WholesalerId) -> StoreResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wholesalers WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn login_account(
        &self,
        phone: &Phone,
    ) -> StoreResult<Option<LoginAccount<WholesalerId>>> {
        let row: Option<(String, String, String, bool)> = sqlx::query_as(
            "SELECT id, name, password_hash, approved FROM wholesalers WHERE phone = ?1",
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

    pub async fn pending(&self) -> StoreResult<Vec<Wholesaler>> {
        let rows: Vec<WholesalerRow> = sqlx::query_as(&format!(
            "SELECT {WHOLESALER_COLUMNS} FROM wholesalers WHERE approved = 0 ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Wholesaler::try_from).collect()
    }

    pub async fn approve(&self, id: WholesalerId) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        approve_wholesaler(&mut conn, id).await
    }

    /// Delete a pending wholesaler, returning its uploaded documents so the
    /// caller can remove the files. `None` when no pending row matched.
    #[instrument(skip(self))]
    pub async fn reject(&self, id: WholesalerId) -> StoreResult<Option<WholesalerDocuments>> {
        let row: Option<(Option<String>, Option<String>)> = sqlx::query_as(
            "DELETE FROM wholesalers WHERE id = ?1 AND approved = 0 \
             RETURNING id_doc_path, license_doc_path",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id_doc_path, license_doc_path)| WholesalerDocuments {
            id_doc_path,
            license_doc_path,
        }))
    }

    /// Returns false when no wholesaler has this id.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, id: WholesalerId, update: &ProfileUpdate) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE wholesalers
            SET name = ?1, shop_name = ?2, location = ?3, sourcing_info = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&update.name)
        .bind(&update.shop_name)
        .bind(&update.location)
        .bind(&update.sourcing_info)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn password_hash(&self, id: WholesalerId) -> StoreResult<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM wholesalers WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(hash,)| hash))
    }

    #[instrument(skip(self, password_hash))]
    pub async fn set_password_hash(&self, id: WholesalerId, password_hash: &str) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE wholesalers SET password_hash = ?1 WHERE id = ?2")
            .bind(password_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point the profile photo at `path`, returning the previous value.
    /// `None` when the wholesaler does not exist.
    #[instrument(skip(self))]
    pub async fn replace_profile_photo(
        &self,
        id: WholesalerId,
        path: &str,
    ) -> StoreResult<Option<Option<String>>> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<(Option<String>,)> =
            sqlx::query_as("SELECT profile_photo FROM wholesalers WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await?;
        let Some((previous,)) = previous else {
            return Ok(None);
        };

        sqlx::query("UPDATE wholesalers SET profile_photo = ?1 WHERE id = ?2")
            .bind(path)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(previous))
    }

    pub async fn scores(&self, id: WholesalerId) -> StoreResult<Option<PerformanceScores>> {
        let row: Option<(f64, f64, f64)> = sqlx::query_as(
            "SELECT trust_score, response_rate, delivery_rate FROM wholesalers WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(trust_score, response_rate, delivery_rate)| PerformanceScores {
            trust_score,
            response_rate,
            delivery_rate,
        }))
    }
}

#[instrument(skip_all, fields(phone = %registration.phone.as_str()))]
pub(crate) async fn register_wholesaler(
    conn: &mut SqliteConnection,
    registration: ValidWholesalerRegistration,
    password_hash: &str,
    documents: WholesalerDocuments,
    now: DateTime<Utc>,
) -> StoreResult<Wholesaler> {
    let wholesaler = Wholesaler {
        id: WholesalerId::new(),
        name: registration.name,
        phone: registration.phone,
        shop_name: registration.shop_name,
        sourcing_info: registration.sourcing_info,
        location: registration.location,
        id_doc_path: documents.id_doc_path,
        license_doc_path: documents.license_doc_path,
        profile_photo: None,
        approved: false,
        scores: PerformanceScores::default(),
        created_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO wholesalers (
            id, name, phone, password_hash, shop_name, sourcing_info, location,
            id_doc_path, license_doc_path, profile_photo, approved,
            trust_score, response_rate, delivery_rate, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, 0, ?10, ?11, ?12, ?13)
        "#,
    )
    .bind(wholesaler.id.to_string())
    .bind(&wholesaler.name)
    .bind(wholesaler.phone.as_str())
    .bind(password_hash)
    .bind(&wholesaler.shop_name)
    .bind(&wholesaler.sourcing_info)
    .bind(&wholesaler.location)
    .bind(&wholesaler.id_doc_path)
    .bind(&wholesaler.license_doc_path)
    .bind(wholesaler.scores.trust_score)
    .bind(wholesaler.scores.response_rate)
    .bind(wholesaler.scores.delivery_rate)
    .bind(wholesaler.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(wholesaler)
}

#[instrument(skip(conn))]
pub(crate) async fn approve_wholesaler(conn: &mut SqliteConnection, id: WholesalerId) -> StoreResult<bool> {
    let result = sqlx::query("UPDATE wholesalers SET approved = 1 WHERE id = ?1")
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use vendorclub_parties::{NewWholesaler, ProfileUpdate};

    use super::*;
    use crate::db::test_support::memory_db;

    fn registration(phone: &str) -> ValidWholesalerRegistration {
        NewWholesaler {
            name: "Mumbai Fresh Mart".into(),
            phone: phone.into(),
            password: "password123".into(),
            shop_name: "Fresh Mart Wholesale".into(),
            sourcing_info: "Local farms".into(),
            location: "Ghatkopar".into(),
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn registration_keeps_document_paths_and_default_scores() {
        let store = memory_db().await.wholesalers();
        let docs = WholesalerDocuments {
            id_doc_path: Some("uploads/id_proof_x_card.pdf".into()),
            license_doc_path: None,
        };
        let w = store.register(registration("9999999999"), "hash", docs, Utc::now()).await.unwrap();

        let loaded = store.find(w.id).await.unwrap().unwrap();
        assert_eq!(loaded.id_doc_path.as_deref(), Some("uploads/id_proof_x_card.pdf"));
        assert_eq!(loaded.scores, PerformanceScores::default());
        assert!(!loaded.approved);
    }

    #[tokio::test]
    async fn reject_returns_documents_for_cleanup() {
        let store = memory_db().await.wholesalers();
        let docs = WholesalerDocuments {
            id_doc_path: Some("uploads/a.pdf".into()),
            license_doc_path: Some("uploads/b.pdf".into()),
        };
        let w = store.register(registration("9999999999"), "hash", docs.clone(), Utc::now()).await.unwrap();

        assert_eq!(store.reject(w.id).await.unwrap(), Some(docs));
        assert_eq!(store.reject(w.id).await.unwrap(), None);
        assert!(!store.exists(w.id).await.unwrap());
    }

    #[tokio::test]
    async fn profile_photo_replacement_reports_previous() {
        let store = memory_db().await.wholesalers();
        let w = store
            .register(registration("9999999999"), "hash", WholesalerDocuments::default(), Utc::now())
            .await
            .unwrap();

        assert_eq!(store.replace_profile_photo(w.id, "uploads/one.png").await.unwrap(), Some(None));
        assert_eq!(
            store.replace_profile_photo(w.id, "uploads/two.png").await.unwrap(),
            Some(Some("uploads/one.png".into()))
        );
        assert_eq!(
            store.replace_profile_photo(WholesalerId::new(), "uploads/x.png").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn profile_and_password_updates() {
        let store = memory_db().await.wholesalers();
        let w = store
            .register(registration("9999999999"), "old", WholesalerDocuments::default(), Utc::now())
            .await
            .unwrap();

        let update = ProfileUpdate {
            name: "Fresh Mart".into(),
            shop_name: "Fresh Mart Ltd".into(),
            location: "Andheri".into(),
            sourcing_info: String::new(),
        };
        assert!(store.update_profile(w.id, &update).await.unwrap());
        assert!(store.set_password_hash(w.id, "new").await.unwrap());

        let loaded = store.find(w.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Fresh Mart");
        assert_eq!(loaded.location, "Andheri");
        assert_eq!(store.password_hash(w.id).await.unwrap().as_deref(), Some("new"));
    }
}
