//! HTTP API Handlers and Routes
//!
//! This module exposes the research team over HTTP, built on the Axum web
//! framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Research (`/api/research`)
//! - `POST /api/research` - Run the team on one message, returns one event
//! - `POST /api/research/{task_id}/cancel` - Always `501 Not Implemented`
//!
//! ## Agents (`/api/agents`)
//! - `GET /api/agents` - The research roster
//!
//! ## Health (`/health`)
//! - `GET /health` - Liveness check, returns `OK`
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/api/openapi.json`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::AppState;
use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Agora", description = "Multi-source research team"),
    paths(
        handlers::research::research,
        handlers::research::cancel_research,
        handlers::agents::list_agents,
    ),
    components(schemas(
        crate::executor::InboundMessage,
        crate::executor::Part,
        crate::executor::OutboundEvent,
        crate::executor::EventKind,
        crate::types::AgentSummary,
        crate::types::Capability,
    )),
    tags(
        (name = "research", description = "Research runs"),
        (name = "agents", description = "Research roster"),
    )
)]
pub struct ApiDoc;

/// The full application: `/health`, the `/api` routes, tracing and CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/api", routes::create_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
