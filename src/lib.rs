//! Product review REST service: CRUD plus batch operations and schema
//! introspection for the `/products/{product_id}/reviews` sub-resource.
//! Persistence and authorization are injected capabilities, so the router can
//! be built in-process for tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod store;
pub mod utils;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::review::ReviewDoc;
use crate::app_state::AppState;
use crate::middleware::auth::jwt_middleware;

/// Assembles the full application router: health endpoints stay public,
/// every review route sits behind the JWT middleware.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(api::review::review_routes())
        .route_layer(from_fn(jwt_middleware));

    Router::new()
        .merge(api::health::health_routes())
        .merge(protected)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ReviewDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
