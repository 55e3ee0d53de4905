// src/lib.rs

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::general::{health_handler, root_handler};
use openapi::ApiDoc;
use routes::api_routes;
use state::AppState;

/// The full application router, shared by the binary and the test suite.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
