use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use vendorclub_core::{ReviewId, WholesalerId};
use vendorclub_reviews::{Rating, Reply, Review};

use crate::StoreError;
use crate::db::{StoreResult, parse_id};

/// A review with the reviewing vendor's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewLine {
    #[serde(flatten)]
    pub review: Review,
    pub vendor_name: String,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: String,
    wholesaler_id: String,
    vendor_id: String,
    rating: i64,
    comment: String,
    reply: Option<String>,
    created_at: DateTime<Utc>,
    vendor_name: String,
}

impl TryFrom<ReviewRow> for ReviewLine {
    type Error = StoreError;

    fn try_from(row: ReviewRow) -> StoreResult<Self> {
        Ok(ReviewLine {
            review: Review {
                id: parse_id(&row.id)?,
                wholesaler_id: parse_id(&row.wholesaler_id)?,
                vendor_id: parse_id(&row.vendor_id)?,
                rating: Rating::new(row.rating)?,
                comment: row.comment,
                reply: row.reply,
                created_at: row.created_at,
            },
            vendor_name: row.vendor_name,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReviewStore {
    pool: SqlitePool,
}

impl ReviewStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, review: &Review) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_review(&mut conn, review).await
    }

    /// Set the reply on a review of `owner`. Returns false when the review
    /// does not exist or is about someone else.
    #[instrument(skip(self, reply))]
    pub async fn set_reply(&self, id: ReviewId, owner: WholesalerId, reply: Reply) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE reviews SET reply = ?1 WHERE id = ?2 AND wholesaler_id = ?3")
            .bind(reply.as_str())
            .bind(id.to_string())
            .bind(owner.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reviews of a wholesaler, newest first; `limit` caps the count.
    pub async fn for_wholesaler(
        &self,
        owner: WholesalerId,
        limit: Option<i64>,
    ) -> StoreResult<Vec<ReviewLine>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.wholesaler_id, r.vendor_id, r.rating, r.comment, r.reply, r.created_at,
                   v.name AS vendor_name
            FROM reviews r
            JOIN vendors v ON v.id = r.vendor_id
            WHERE r.wholesaler_id = ?1
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?2
            "#,
        )
        .bind(owner.to_string())
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ReviewLine::try_from).collect()
    }
}

#[instrument(skip_all, fields(review_id = %review.id, wholesaler_id = %review.wholesaler_id))]
pub(crate) async fn insert_review(conn: &mut SqliteConnection, review: &Review) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, wholesaler_id, vendor_id, rating, comment, reply, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(review.id.to_string())
    .bind(review.wholesaler_id.to_string())
    .bind(review.vendor_id.to_string())
    .bind(review.rating.value())
    .bind(&review.comment)
    .bind(&review.reply)
    .bind(review.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use vendorclub_reviews::ReviewDraft;

    use super::*;
    use crate::db::test_support::{memory_db, vendor, wholesaler_with_product};

    #[tokio::test]
    async fn reviews_list_newest_first_with_vendor_names() {
        let db = memory_db().await;
        let (w, _) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let store = db.reviews();

        let older = Review::write(
            v,
            ReviewDraft::new(w, 5, "Excellent quality vegetables").unwrap(),
            Utc::now() - Duration::hours(2),
        );
        let newer = Review::write(v, ReviewDraft::new(w, 4, "Good supplier").unwrap(), Utc::now());
        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();

        let lines = store.for_wholesaler(w, None).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].review.id, newer.id);
        assert_eq!(lines[0].vendor_name, "Raj Patel");
        assert_eq!(store.for_wholesaler(w, Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reply_is_owner_scoped() {
        let db = memory_db().await;
        let (w, _) = wholesaler_with_product(&db).await;
        let v = vendor(&db, "9876543210").await;
        let review = Review::write(v, ReviewDraft::new(w, 4, "Good").unwrap(), Utc::now());
        db.reviews().insert(&review).await.unwrap();

        let reply = || Reply::parse("Thank you for your feedback!").unwrap();
        assert!(!db.reviews().set_reply(review.id, WholesalerId::new(), reply()).await.unwrap());
        assert!(db.reviews().set_reply(review.id, w, reply()).await.unwrap());

        let lines = db.reviews().for_wholesaler(w, None).await.unwrap();
        assert_eq!(lines[0].review.reply.as_deref(), Some("Thank you for your feedback!"));
    }
}
