use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{Timelike, Utc};
use tokio::sync::RwLock;

use crate::models::review::{NewReviewRecord, Review, ReviewUpdate};
use crate::store::{ReviewStore, StoreError};

/// In-memory review store.
///
/// Backs the test suite and dev instances running without Postgres. Reviews
/// live in a `BTreeMap` keyed by id so listings come back id-ordered; ids are
/// assigned from an atomic counter starting at 1.
#[derive(Debug)]
pub struct MemoryReviewStore {
    inner: RwLock<Inner>,
    next_id: AtomicI32,
}

#[derive(Debug, Default)]
struct Inner {
    products: HashSet<i32>,
    reviews: BTreeMap<i32, Review>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Registers a product id reviews may attach to. The product catalog is
    /// outside this service, so the memory backend takes ids as given.
    pub async fn add_product(&self, product_id: i32) {
        self.inner.write().await.products.insert(product_id);
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn product_exists(&self, product_id: i32) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.products.contains(&product_id))
    }

    async fn list(&self, product_id: i32) -> Result<Vec<Review>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn get(&self, product_id: i32, id: i32) -> Result<Option<Review>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .reviews
            .get(&id)
            .filter(|r| r.product_id == product_id)
            .cloned())
    }

    async fn create(
        &self,
        product_id: i32,
        fields: NewReviewRecord,
    ) -> Result<Review, StoreError> {
        let now = Utc::now().naive_utc();
        let date_created = now.with_nanosecond(0).unwrap_or(now);
        let review = Review {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            product_id,
            review: fields.review,
            rating: fields.rating,
            name: fields.name,
            email: fields.email,
            date_created,
            verified: false,
        };
        self.inner
            .write()
            .await
            .reviews
            .insert(review.id, review.clone());
        Ok(review)
    }

    async fn update(
        &self,
        product_id: i32,
        id: i32,
        fields: ReviewUpdate,
    ) -> Result<Option<Review>, StoreError> {
        let mut guard = self.inner.write().await;
        let Some(stored) = guard
            .reviews
            .get_mut(&id)
            .filter(|r| r.product_id == product_id)
        else {
            return Ok(None);
        };
        if let Some(review) = fields.review {
            stored.review = review;
        }
        if let Some(name) = fields.name {
            stored.name = name;
        }
        if let Some(email) = fields.email {
            stored.email = email;
        }
        if let Some(rating) = fields.rating {
            stored.rating = rating;
        }
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, product_id: i32, id: i32, _force: bool) -> Result<bool, StoreError> {
        // No trash concept in memory; force and plain delete both remove.
        let mut guard = self.inner.write().await;
        let belongs = guard
            .reviews
            .get(&id)
            .is_some_and(|r| r.product_id == product_id);
        if !belongs {
            return Ok(false);
        }
        guard.reviews.remove(&id);
        Ok(true)
    }
}
