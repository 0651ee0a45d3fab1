//! HTTP API Layer
//!
//! This crate provides the REST API for the claims system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for claims, documents, AI operations,
//!   and the dashboard
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState { pool, workflow, config });
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::ClaimWorkflow;

use crate::config::ApiConfig;
use crate::handlers::{ai, claims, dashboard, documents, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub workflow: Arc<ClaimWorkflow>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state: the database pool for readiness
///   checks, the workflow engine, and the API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claim routes
    let claims_routes = Router::new()
        .route("/", post(claims::create_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", patch(claims::update_status))
        .route("/:id/history", get(claims::status_history));

    // Document routes
    let documents_routes = Router::new()
        .route("/", post(documents::register_document))
        .route("/upload-url", post(documents::request_upload_url));

    // AI routes
    let ai_routes = Router::new()
        .route("/extract-document", post(ai::extract_document))
        .route("/summarize-claim", post(ai::summarize_claim))
        .route("/check-eligibility", post(ai::check_eligibility));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/documents", documents_routes)
        .nest("/ai", ai_routes)
        .route("/dashboard", get(dashboard::get_dashboard))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
