use crate::AppState;
use crate::api::ApiDoc;
use axum::{
    Json, Router,
    routing::{get, post},
};
use utoipa::OpenApi;

/// Routes served under `/api`
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/agents", get(crate::api::handlers::agents::list_agents))
        .route(
            "/research",
            post(crate::api::handlers::research::research),
        )
        .route(
            "/research/{task_id}/cancel",
            post(crate::api::handlers::research::cancel_research),
        )
        .route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
