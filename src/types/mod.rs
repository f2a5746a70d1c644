use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use utoipa::ToSchema;

// ============= Research Types =============

/// The user's research topic: the single unit of work for one run.
///
/// A `Query` is immutable once accepted. Construction trims surrounding
/// whitespace and rejects blank text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Query text is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Query {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        Query::new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

/// Source domain a research worker is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Community forums (Reddit-like)
    CommunityForum,
    /// Technical news forums (Hacker News-like)
    TechnicalForum,
    /// Scholarly paper indexes, metadata only
    ScholarlyIndex,
    /// Microblogs and real-time trending discussion
    Microblog,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CommunityForum => "community_forum",
            Capability::TechnicalForum => "technical_forum",
            Capability::ScholarlyIndex => "scholarly_index",
            Capability::Microblog => "microblog",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One worker's raw structured-text output for a query.
///
/// The body is opaque markdown; the coordinator only bounds its length and
/// harvests links from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub worker: String,
    pub body: String,
}

impl Finding {
    pub fn new(worker: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            worker: worker.into(),
            body: body.into(),
        }
    }
}

// ============= API Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgentSummary {
    pub name: String,
    pub role: String,
    pub capability: Capability,
    pub min_findings: usize,
    pub table_columns: Vec<String>,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Worker '{worker}' failed: {reason}")]
    Worker { worker: String, reason: String },

    #[error("Research run timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, AppError::Timeout(_))
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Aggregation(_) | AppError::Worker { .. } | AppError::Tool(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::LLM(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
