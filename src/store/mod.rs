pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::review::{NewReviewRecord, Review, ReviewUpdate};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Abstract persistence interface for product reviews.
///
/// Missing products and reviews are sentinels (`false` / `None`), not errors,
/// so the controller maps them to 404 uniformly. `StoreError` is reserved for
/// backend failures. Implementations must be thread-safe and own their
/// concurrency control (atomic id assignment, write isolation).
#[async_trait]
pub trait ReviewStore: Send + Sync + 'static {
    /// Backend connectivity probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn product_exists(&self, product_id: i32) -> Result<bool, StoreError>;

    /// All reviews for a product, ordered by id.
    async fn list(&self, product_id: i32) -> Result<Vec<Review>, StoreError>;

    /// A single review, scoped to the product it was addressed through.
    async fn get(&self, product_id: i32, id: i32) -> Result<Option<Review>, StoreError>;

    /// Persists a new review, assigning `id` and `date_created`.
    async fn create(
        &self,
        product_id: i32,
        fields: NewReviewRecord,
    ) -> Result<Review, StoreError>;

    /// Merges the supplied fields onto the stored record; omitted fields are
    /// untouched. Returns the merged record, or `None` if absent.
    async fn update(
        &self,
        product_id: i32,
        id: i32,
        fields: ReviewUpdate,
    ) -> Result<Option<Review>, StoreError>;

    /// Removes a review. `force` requests permanent removal; backends without
    /// a trash concept treat both the same. Returns whether a record went.
    async fn delete(&self, product_id: i32, id: i32, force: bool) -> Result<bool, StoreError>;
}
