use axum::{
    extract::{Extension, Path as AxumPath, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::OpenApi;

use crate::api::schema::schema_document;
use crate::app_state::AppState;
use crate::config::Config;
use crate::gate::{Action, AuthContext};
use crate::middleware::auth::Claims;
use crate::models::review::{
    BatchFailure, BatchItemError, BatchOutcome, BatchRequest, BatchResponse, BatchUpdate, Href,
    NewReview, ReviewLinks, ReviewResponse, ReviewUpdate, ReviewWithLinks,
};
use crate::store::StoreError;
use crate::utils::api_response::ApiResponse;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products/{product_id}/reviews",
            get(list_reviews)
                .post(create_review)
                .options(review_schema),
        )
        .route(
            "/products/{product_id}/reviews/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/products/{product_id}/reviews/batch", post(batch_reviews))
}

//
// SHARED PRECONDITIONS
//

/// Builds the gate context from the verified claims; a non-numeric subject
/// cannot be authorized.
fn auth_context(claims: &Claims, product_id: i32) -> Result<AuthContext, ApiResponse<()>> {
    let user_id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| ApiResponse::unauthorized("Invalid user ID in token"))?;
    Ok(AuthContext::from_claims(claims, user_id, product_id))
}

fn authorize(state: &AppState, action: Action, ctx: &AuthContext) -> Result<(), ApiResponse<()>> {
    if state.gate.authorize(action, ctx) {
        Ok(())
    } else {
        Err(ApiResponse::unauthorized(
            "You are not allowed to perform this action",
        ))
    }
}

async fn ensure_product(state: &AppState, product_id: i32) -> Result<(), ApiResponse<()>> {
    let exists = state
        .store
        .product_exists(product_id)
        .await
        .map_err(store_failure)?;
    if exists {
        Ok(())
    } else {
        Err(ApiResponse::not_found("Product not found"))
    }
}

fn store_failure(err: StoreError) -> ApiResponse<()> {
    tracing::error!("review store failure: {err}");
    ApiResponse::internal("Review store unavailable")
}

//
// REVIEW CRUD HANDLERS
//

#[axum::debug_handler]
#[utoipa::path(
    get,
    path = "/products/{product_id}/reviews",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the reviews belong to"),
    ),
    responses(
        (status = 200, description = "Reviews retrieved successfully", body = Vec<ReviewWithLinks>),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath(product_id): AxumPath<i32>,
) -> Result<ApiResponse<Vec<ReviewWithLinks>>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Read, &ctx)?;
    ensure_product(&state, product_id).await?;

    let base_url = Config::get().public_url.clone();
    let reviews = state
        .store
        .list(product_id)
        .await
        .map_err(store_failure)?
        .into_iter()
        .map(|r| ReviewWithLinks::new(r, &base_url))
        .collect();

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Reviews retrieved successfully",
        reviews,
    ))
}

#[axum::debug_handler]
#[utoipa::path(
    get,
    path = "/products/{product_id}/reviews/{id}",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the review belongs to"),
        ("id" = i32, Path, description = "ID of the review being retrieved"),
    ),
    responses(
        (status = 200, description = "Review retrieved successfully", body = ReviewResponse),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product or review not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath((product_id, id)): AxumPath<(i32, i32)>,
) -> Result<ApiResponse<ReviewResponse>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Read, &ctx)?;
    ensure_product(&state, product_id).await?;

    // A review filed under another product is not found here, by contract.
    let review = state
        .store
        .get(product_id, id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiResponse::not_found("Review not found"))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Review retrieved successfully",
        review.into(),
    ))
}

#[axum::debug_handler]
#[utoipa::path(
    post,
    path = "/products/{product_id}/reviews",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product to review"),
    ),
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created successfully", body = ReviewResponse),
        (status = 400, description = "Required field missing or empty"),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath(product_id): AxumPath<i32>,
    Json(payload): Json<NewReview>,
) -> Result<ApiResponse<ReviewResponse>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Create, &ctx)?;
    ensure_product(&state, product_id).await?;

    let record = payload.validate().map_err(|missing| {
        ApiResponse::bad_request("Missing required fields", json!({ "fields": missing }))
    })?;

    let review = state
        .store
        .create(product_id, record)
        .await
        .map_err(store_failure)?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Review created successfully",
        review.into(),
    ))
}

#[axum::debug_handler]
#[utoipa::path(
    put,
    path = "/products/{product_id}/reviews/{id}",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the review belongs to"),
        ("id" = i32, Path, description = "ID of the review to be updated"),
    ),
    request_body = ReviewUpdate,
    responses(
        (status = 200, description = "Review updated successfully", body = ReviewResponse),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product or review not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath((product_id, id)): AxumPath<(i32, i32)>,
    Json(payload): Json<ReviewUpdate>,
) -> Result<ApiResponse<ReviewResponse>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Update, &ctx)?;
    ensure_product(&state, product_id).await?;

    let review = state
        .store
        .update(product_id, id, payload)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiResponse::not_found("Review not found"))?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Review updated successfully",
        review.into(),
    ))
}

#[derive(Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    force: bool,
}

#[axum::debug_handler]
#[utoipa::path(
    delete,
    path = "/products/{product_id}/reviews/{id}",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the review belongs to"),
        ("id" = i32, Path, description = "ID of the review to be deleted"),
        ("force" = Option<bool>, Query, description = "Skip trash and remove permanently"),
    ),
    responses(
        (status = 200, description = "Review deleted successfully", body = ReviewResponse),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product or review not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath((product_id, id)): AxumPath<(i32, i32)>,
    Query(params): Query<DeleteParams>,
) -> Result<ApiResponse<ReviewResponse>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Delete, &ctx)?;
    ensure_product(&state, product_id).await?;

    // Fetch first so the response can echo what was removed; trash-vs-
    // permanent behind `force` is the store's call.
    let review = state
        .store
        .get(product_id, id)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| ApiResponse::not_found("Review not found"))?;
    let deleted = state
        .store
        .delete(product_id, id, params.force)
        .await
        .map_err(store_failure)?;
    if !deleted {
        return Err(ApiResponse::not_found("Review not found"));
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Review deleted successfully",
        review.into(),
    ))
}

//
// BATCH HANDLER
//

#[axum::debug_handler]
#[utoipa::path(
    post,
    path = "/products/{product_id}/reviews/batch",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the reviews belong to"),
    ),
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Batch processed", body = BatchResponse),
        (status = 401, description = "Missing or insufficient permission"),
        (status = 404, description = "Product not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn batch_reviews(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath(product_id): AxumPath<i32>,
    Json(payload): Json<BatchRequest>,
) -> Result<ApiResponse<BatchResponse>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;

    // The gate is consulted once per phase present in the request, before any
    // store access; a denied phase fails the whole batch, matching the
    // single-operation endpoints.
    if !payload.create.is_empty() {
        authorize(&state, Action::Create, &ctx)?;
    }
    if !payload.update.is_empty() {
        authorize(&state, Action::Update, &ctx)?;
    }
    if !payload.delete.is_empty() {
        authorize(&state, Action::Delete, &ctx)?;
    }
    ensure_product(&state, product_id).await?;

    // Phase order is a documented contract: creates are visible to updates,
    // updates are visible to deletes, never the other way around. A failed
    // item is reported in place while the rest of the batch commits.
    let mut result = BatchResponse::default();
    for item in payload.create {
        result.create.push(batch_create(&state, product_id, item).await?);
    }
    for item in payload.update {
        result.update.push(batch_update(&state, product_id, item).await?);
    }
    for id in payload.delete {
        result.delete.push(batch_delete(&state, product_id, id).await?);
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Batch processed",
        result,
    ))
}

async fn batch_create(
    state: &AppState,
    product_id: i32,
    item: NewReview,
) -> Result<BatchOutcome, ApiResponse<()>> {
    let record = match item.validate() {
        Ok(record) => record,
        Err(missing) => {
            return Ok(BatchOutcome::failed(
                None,
                "invalid_field",
                format!("Missing required fields: {}", missing.join(", ")),
            ));
        }
    };
    let review = state
        .store
        .create(product_id, record)
        .await
        .map_err(store_failure)?;
    Ok(BatchOutcome::Ok(review.into()))
}

async fn batch_update(
    state: &AppState,
    product_id: i32,
    item: BatchUpdate,
) -> Result<BatchOutcome, ApiResponse<()>> {
    let updated = state
        .store
        .update(product_id, item.id, item.fields)
        .await
        .map_err(store_failure)?;
    Ok(match updated {
        Some(review) => BatchOutcome::Ok(review.into()),
        None => BatchOutcome::failed(Some(item.id), "not_found", "Review not found"),
    })
}

async fn batch_delete(
    state: &AppState,
    product_id: i32,
    id: i32,
) -> Result<BatchOutcome, ApiResponse<()>> {
    let existing = state
        .store
        .get(product_id, id)
        .await
        .map_err(store_failure)?;
    let Some(review) = existing else {
        return Ok(BatchOutcome::failed(Some(id), "not_found", "Review not found"));
    };
    // Batch deletes are permanent; there is no per-item force flag to forward.
    let deleted = state
        .store
        .delete(product_id, id, true)
        .await
        .map_err(store_failure)?;
    Ok(if deleted {
        BatchOutcome::Ok(review.into())
    } else {
        BatchOutcome::failed(Some(id), "not_found", "Review not found")
    })
}

//
// SCHEMA INTROSPECTION
//

#[axum::debug_handler]
#[utoipa::path(
    options,
    path = "/products/{product_id}/reviews",
    tag = "Reviews",
    params(
        ("product_id" = i32, Path, description = "Product the reviews belong to"),
    ),
    responses(
        (status = 200, description = "Declared review fields"),
        (status = 401, description = "Missing or insufficient permission"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn review_schema(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AxumPath(product_id): AxumPath<i32>,
) -> Result<ApiResponse<serde_json::Value>, ApiResponse<()>> {
    let ctx = auth_context(&claims, product_id)?;
    authorize(&state, Action::Read, &ctx)?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Schema retrieved successfully",
        schema_document(),
    ))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_reviews,
        get_review,
        create_review,
        update_review,
        delete_review,
        batch_reviews,
        review_schema
    ),
    components(
        schemas(
            ReviewResponse,
            ReviewWithLinks,
            ReviewLinks,
            Href,
            NewReview,
            ReviewUpdate,
            BatchRequest,
            BatchUpdate,
            BatchResponse,
            BatchOutcome,
            BatchFailure,
            BatchItemError
        )
    ),
    tags(
        (name = "Reviews", description = "Product Review Endpoints")
    )
)]
pub struct ReviewDoc;
