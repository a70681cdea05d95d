use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// **Review Record as Persisted by the Store**
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub review: String,
    pub rating: i32,
    pub name: String,
    pub email: String,
    pub date_created: NaiveDateTime, // second precision, no offset
    pub verified: bool,
}

/// **Review Representation Returned to Clients**
///
/// Same fields as [`Review`] minus `product_id`, which is already carried by
/// the URL the review was addressed through.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub date_created: NaiveDateTime,
    pub review: String,
    pub rating: i32,
    pub name: String,
    pub email: String,
    pub verified: bool,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            date_created: r.date_created,
            review: r.review,
            rating: r.rating,
            name: r.name,
            email: r.email,
            verified: r.verified,
        }
    }
}

/// **New Review Request (Frontend Sends This)**
///
/// Required fields are `Option` so a missing field surfaces as a 400 with a
/// per-field error instead of a deserialization rejection.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct NewReview {
    pub review: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub rating: i32,
}

impl NewReview {
    /// Checks the required fields (`review`, `name`, `email`) are present and
    /// non-empty. Returns the validated record, or the names of the fields
    /// that failed.
    pub fn validate(&self) -> Result<NewReviewRecord, Vec<&'static str>> {
        fn required(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        let mut missing = Vec::new();
        let review = required(&self.review);
        let name = required(&self.name);
        let email = required(&self.email);
        if review.is_none() {
            missing.push("review");
        }
        if name.is_none() {
            missing.push("name");
        }
        if email.is_none() {
            missing.push("email");
        }
        match (review, name, email) {
            (Some(review), Some(name), Some(email)) => Ok(NewReviewRecord {
                review,
                name,
                email,
                rating: self.rating,
            }),
            _ => Err(missing),
        }
    }
}

/// Validated create payload handed to the store.
#[derive(Debug, Clone)]
pub struct NewReviewRecord {
    pub review: String,
    pub name: String,
    pub email: String,
    pub rating: i32,
}

/// **Update Review Request**
///
/// Every field optional; omitted fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ReviewUpdate {
    pub review: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<i32>,
}

/// **Batch Request: Create, Update and Delete in One Call**
///
/// Phases always apply create, then update, then delete, each in input order.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct BatchRequest {
    #[serde(default)]
    pub create: Vec<NewReview>,
    #[serde(default)]
    pub update: Vec<BatchUpdate>,
    #[serde(default)]
    pub delete: Vec<i32>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct BatchUpdate {
    pub id: i32,
    #[serde(flatten)]
    pub fields: ReviewUpdate,
}

/// **Batch Result, Mirroring the Request Shape**
#[derive(Serialize, Debug, Clone, Default, ToSchema)]
pub struct BatchResponse {
    pub create: Vec<BatchOutcome>,
    pub update: Vec<BatchOutcome>,
    pub delete: Vec<BatchOutcome>,
}

/// Per-item batch result. A failed item never aborts the batch; it is
/// reported in place while the remaining items commit.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum BatchOutcome {
    Ok(ReviewResponse),
    Failed(BatchFailure),
}

impl BatchOutcome {
    pub fn failed(id: Option<i32>, code: &str, message: impl Into<String>) -> Self {
        Self::Failed(BatchFailure {
            id,
            error: BatchItemError {
                code: code.to_string(),
                message: message.into(),
            },
        })
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct BatchFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub error: BatchItemError,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct BatchItemError {
    pub code: String,
    pub message: String,
}

/// **Review Representation With Hypermedia Links (List Responses)**
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ReviewWithLinks {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub _links: ReviewLinks,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ReviewLinks {
    #[serde(rename = "self")]
    pub self_: Vec<Href>,
    pub collection: Vec<Href>,
    pub up: Vec<Href>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct Href {
    pub href: String,
}

impl ReviewWithLinks {
    /// Attaches self/collection/up links built from the public base URL.
    pub fn new(review: Review, base_url: &str) -> Self {
        let product_id = review.product_id;
        let id = review.id;
        Self {
            review: review.into(),
            _links: ReviewLinks {
                self_: vec![Href {
                    href: format!("{base_url}/products/{product_id}/reviews/{id}"),
                }],
                collection: vec![Href {
                    href: format!("{base_url}/products/{product_id}/reviews"),
                }],
                up: vec![Href {
                    href: format!("{base_url}/products/{product_id}"),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn full_payload() -> NewReview {
        NewReview {
            review: Some("Great product".to_string()),
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            rating: 4,
        }
    }

    #[test]
    fn validate_accepts_full_payload() {
        let record = full_payload().validate().expect("payload should be valid");
        assert_eq!(record.review, "Great product");
        assert_eq!(record.rating, 4);
    }

    #[test]
    fn validate_reports_each_missing_field() {
        for field in ["review", "name", "email"] {
            let mut payload = full_payload();
            match field {
                "review" => payload.review = None,
                "name" => payload.name = None,
                _ => payload.email = None,
            }
            let missing = payload.validate().expect_err("field should be required");
            assert_eq!(missing, vec![field]);
        }
    }

    #[test]
    fn validate_rejects_blank_strings() {
        let mut payload = full_payload();
        payload.email = Some("   ".to_string());
        let missing = payload.validate().expect_err("blank email should fail");
        assert_eq!(missing, vec!["email"]);
    }

    #[test]
    fn rating_defaults_to_zero_when_omitted() {
        let payload: NewReview =
            serde_json::from_value(serde_json::json!({
                "review": "ok", "name": "Ada", "email": "ada@example.com"
            }))
            .unwrap();
        assert_eq!(payload.rating, 0);
    }

    #[test]
    fn links_point_at_the_review_its_collection_and_the_product() {
        let review = Review {
            id: 9,
            product_id: 4,
            review: "ok".to_string(),
            rating: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            date_created: NaiveDate::from_ymd_opt(2016, 1, 1)
                .unwrap()
                .and_hms_opt(11, 11, 11)
                .unwrap(),
            verified: false,
        };
        let with_links = ReviewWithLinks::new(review, "http://shop.local");
        assert_eq!(
            with_links._links.self_[0].href,
            "http://shop.local/products/4/reviews/9"
        );
        assert_eq!(
            with_links._links.collection[0].href,
            "http://shop.local/products/4/reviews"
        );
        assert_eq!(with_links._links.up[0].href, "http://shop.local/products/4");
    }

    #[test]
    fn date_created_serializes_without_offset() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(11, 11, 11)
            .unwrap();
        let json = serde_json::to_value(date).unwrap();
        assert_eq!(json, serde_json::json!("2016-01-01T11:11:11"));
    }
}
