use crate::{AppState, types::AgentSummary};
use axum::{Json, extract::State};

/// List the research workers on the team, in roster order
#[utoipa::path(
    get,
    path = "/api/agents",
    responses(
        (status = 200, description = "Research roster", body = [AgentSummary])
    ),
    tag = "agents"
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(state.roster.iter().map(AgentSummary::from).collect())
}
