//! Request Execution Boundary
//!
//! [`RequestAdapter`] sits between an inbound message and the research team.
//! It pulls the query text out of the message, runs the team under one
//! deadline and reports the outcome as exactly one [`OutboundEvent`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──receive──▶ Running ──report──▶ Done
//!                      │
//!                      └──no text / timeout / error──▶ Failed
//! ```
//!
//! Cancellation is not supported: [`RequestAdapter::cancel`] always returns
//! [`AppError::Unsupported`].

use crate::research::ResearchTeam;
use crate::types::{AppError, Query, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Deadline for one research run when none is configured.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(600);

const NO_CONTENT_MESSAGE: &str = "Error: No message content received.";
const TIMEOUT_MESSAGE: &str = "Error: Research team execution timed out. The discussion might be \
     too complex or require more time. Please try again or simplify your query.";

// ============= Inbound =============

/// One part of an inbound message. Only text parts carry a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    File {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Data {
        #[schema(value_type = Object)]
        data: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InboundMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl InboundMessage {
    /// A message with a single text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message_id: None,
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Text of the first text part, if any
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ============= Outbound =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The payload is the report text
    Report,
    /// The payload is a human-readable error message
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutboundEvent {
    pub id: Uuid,
    pub task_id: Uuid,
    pub kind: EventKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl OutboundEvent {
    fn new(task_id: Uuid, kind: EventKind, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            kind,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == EventKind::Error
    }
}

/// Sink for outbound events
#[derive(Debug, Clone)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl EventQueue {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, event: OutboundEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| AppError::Internal("event receiver dropped".to_string()))
    }
}

// ============= State Machine =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Idle, RunState::Running)
                | (RunState::Running, RunState::Done)
                | (RunState::Running, RunState::Failed)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// State of one request as it moves through the adapter.
struct Run {
    task_id: Uuid,
    state: RunState,
}

impl Run {
    fn new() -> Self {
        Self {
            task_id: Uuid::new_v4(),
            state: RunState::Idle,
        }
    }

    fn advance(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(AppError::Internal(format!(
                "illegal run transition {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!(from = %self.state, to = %next, "run state changed");
        self.state = next;
        Ok(())
    }

    /// Emit the single outbound event and enter the matching terminal state.
    fn finish(&mut self, queue: &EventQueue, kind: EventKind, text: String) -> Result<RunState> {
        let next = match kind {
            EventKind::Report => RunState::Done,
            EventKind::Error => RunState::Failed,
        };
        self.advance(next)?;
        queue.enqueue(OutboundEvent::new(self.task_id, kind, text))?;
        Ok(self.state)
    }
}

// ============= Adapter =============

/// Outcome of one [`RequestAdapter::execute`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub task_id: Uuid,
    pub state: RunState,
}

pub struct RequestAdapter {
    team: Arc<dyn ResearchTeam>,
    deadline: Duration,
}

impl RequestAdapter {
    pub fn new(team: Arc<dyn ResearchTeam>) -> Self {
        Self {
            team,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Handle one inbound message, emitting exactly one event on `queue`.
    ///
    /// Research failures are reported through the event, not the return
    /// value. An `Err` means the event itself could not be delivered.
    pub async fn execute(&self, message: &InboundMessage, queue: &EventQueue) -> Result<Execution> {
        let mut run = Run::new();
        let span = tracing::info_span!(
            "request",
            task_id = %run.task_id,
            message_id = message.message_id.as_deref().unwrap_or("-")
        );

        self.drive(&mut run, message, queue).instrument(span).await
    }

    async fn drive(
        &self,
        run: &mut Run,
        message: &InboundMessage,
        queue: &EventQueue,
    ) -> Result<Execution> {
        run.advance(RunState::Running)?;

        let query = match message.first_text().map(Query::new) {
            Some(Ok(query)) => query,
            _ => {
                tracing::warn!(parts = message.parts.len(), "no text content in request");
                let state = run.finish(queue, EventKind::Error, NO_CONTENT_MESSAGE.to_string())?;
                return Ok(Execution {
                    task_id: run.task_id,
                    state,
                });
            }
        };

        tracing::info!(query = %query, deadline_secs = self.deadline.as_secs(), "running research team");

        // The team enforces the deadline itself; the outer timeout bounds a
        // team that ignores it.
        let outcome =
            match tokio::time::timeout(self.deadline, self.team.run(&query, self.deadline)).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(self.deadline)),
            };

        let state = match outcome {
            Ok(report) => {
                tracing::info!(chars = report.text.len(), "report delivered");
                run.finish(queue, EventKind::Report, report.text)?
            }
            Err(e) if e.is_timeout() => {
                tracing::error!(error = %e, "research team timed out");
                run.finish(queue, EventKind::Error, TIMEOUT_MESSAGE.to_string())?
            }
            Err(e) => {
                tracing::error!(error = %e, "research team failed");
                run.finish(
                    queue,
                    EventKind::Error,
                    format!(
                        "Error: Error during research team execution: {}. Please check logs for details.",
                        e
                    ),
                )?
            }
        };

        Ok(Execution {
            task_id: run.task_id,
            state,
        })
    }

    /// Cancellation is never supported, for in-flight or finished runs alike.
    pub fn cancel(&self, task_id: Uuid) -> Result<()> {
        tracing::warn!(%task_id, "cancel requested but not supported");
        Err(AppError::Unsupported(
            "Cancel not supported for the research team".to_string(),
        ))
    }
}
