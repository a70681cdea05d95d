use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::review::{NewReviewRecord, Review, ReviewUpdate};
use crate::store::{ReviewStore, StoreError};

/// Postgres-backed review store.
///
/// Uses the runtime query API (no compile-time checked macros) so the crate
/// builds without a live database. Non-force deletes move the row to trash
/// via the `trashed` flag; trashed rows are invisible to reads.
/// Schema lives in `migrations/0001_product_reviews.sql`.
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str =
    "id, product_id, review, rating, name, email, date_created, verified";

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn product_exists(&self, product_id: i32) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list(&self, product_id: i32) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product_reviews \
             WHERE product_id = $1 AND NOT trashed ORDER BY id"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }

    async fn get(&self, product_id: i32, id: i32) -> Result<Option<Review>, StoreError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product_reviews \
             WHERE product_id = $1 AND id = $2 AND NOT trashed"
        ))
        .bind(product_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn create(
        &self,
        product_id: i32,
        fields: NewReviewRecord,
    ) -> Result<Review, StoreError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO product_reviews (product_id, review, rating, name, email, date_created, verified) \
             VALUES ($1, $2, $3, $4, $5, date_trunc('second', timezone('utc', now())), FALSE) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(&fields.review)
        .bind(fields.rating)
        .bind(&fields.name)
        .bind(&fields.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(review)
    }

    async fn update(
        &self,
        product_id: i32,
        id: i32,
        fields: ReviewUpdate,
    ) -> Result<Option<Review>, StoreError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "UPDATE product_reviews \
                SET review = COALESCE($3, review), \
                    name = COALESCE($4, name), \
                    email = COALESCE($5, email), \
                    rating = COALESCE($6, rating) \
              WHERE product_id = $1 AND id = $2 AND NOT trashed \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(id)
        .bind(fields.review)
        .bind(fields.name)
        .bind(fields.email)
        .bind(fields.rating)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn delete(&self, product_id: i32, id: i32, force: bool) -> Result<bool, StoreError> {
        let result = if force {
            sqlx::query("DELETE FROM product_reviews WHERE product_id = $1 AND id = $2")
                .bind(product_id)
                .bind(id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query(
                "UPDATE product_reviews SET trashed = TRUE \
                  WHERE product_id = $1 AND id = $2 AND NOT trashed",
            )
            .bind(product_id)
            .bind(id)
            .execute(&self.pool)
            .await?
        };
        Ok(result.rows_affected() > 0)
    }
}
