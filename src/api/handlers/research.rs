use crate::{
    AppState,
    executor::{EventQueue, InboundMessage, OutboundEvent},
    types::{AppError, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Run the research team on one inbound message
///
/// The response is the single outbound event for the request. Research
/// failures (no text, timeout, every worker failing) arrive as an event of
/// kind `error`, not as an HTTP error.
#[utoipa::path(
    post,
    path = "/api/research",
    request_body = InboundMessage,
    responses(
        (status = 200, description = "Research finished or failed", body = OutboundEvent),
        (status = 500, description = "The event could not be delivered")
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> Result<Json<OutboundEvent>> {
    let (queue, mut events) = EventQueue::new();

    state.adapter.execute(&message, &queue).await?;
    drop(queue);

    let event = events
        .recv()
        .await
        .ok_or_else(|| AppError::Internal("research run produced no event".to_string()))?;

    Ok(Json(event))
}

/// Cancel a research run (always rejected)
#[utoipa::path(
    post,
    path = "/api/research/{task_id}/cancel",
    params(
        ("task_id" = Uuid, Path, description = "Task id from a previous event")
    ),
    responses(
        (status = 501, description = "Cancellation is not supported")
    ),
    tag = "research"
)]
pub async fn cancel_research(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.adapter.cancel(task_id)?;
    Ok(StatusCode::NO_CONTENT)
}
