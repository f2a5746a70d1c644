//! # Agora - Multi-Source Research Team
//!
//! Agora answers one research question by sending it to a small team of
//! source-bound research workers (community forums, technical news, scholarly
//! paper indexes, microblogs), compressing each worker's finding as it
//! arrives, and synthesizing a single six-section markdown report.
//!
//! ## Overview
//!
//! Agora can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `agora-server` binary
//! 2. **As a library** - Drive a [`Coordinator`] or [`RequestAdapter`] directly
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use agora::{AgoraConfig, Coordinator, Query};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AgoraConfig::load_or_default("agora.toml")?;
//!     let team = Coordinator::from_config(&config).await?;
//!
//!     let query = Query::new("Impact of AI on jobs")?;
//!     let report = team.run(&query, Duration::from_secs(600)).await?;
//!     println!("{}", report.text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API and compatible endpoints |
//!
//! ## Modules
//!
//! - [`agents`] - Worker specs, the default roster and the generic research worker
//! - [`research`] - Shared context, summarization, synthesis policy, coordinator
//! - [`executor`] - Request adapter: one inbound message in, one event out
//! - [`api`] - REST API handlers and routes
//! - [`llm`] - LLM client implementations
//! - [`tools`] - Search capabilities (web, Hacker News, arXiv)
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Research workers and their specifications.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line parsing and terminal output.
pub mod cli;
/// Inbound request handling and outbound events.
pub mod executor;
/// LLM provider clients and abstractions.
pub mod llm;
/// Multi-agent research coordination.
pub mod research;
/// Search capabilities bound to research workers.
pub mod tools;
/// Core types (query, findings, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use agents::{Agent, ResearchWorker, WorkerSpec};
pub use executor::{EventQueue, InboundMessage, OutboundEvent, RequestAdapter};
pub use llm::{LLMClient, LLMClientFactory, Provider};
pub use research::{Coordinator, Report, ResearchTeam};
pub use tools::{CapabilityRegistry, SearchCapability};
pub use types::{AppError, Query, Result};
pub use utils::config::AgoraConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// TOML configuration, fixed at process start
    pub config: Arc<AgoraConfig>,
    /// Adapter wrapping the research team
    pub adapter: Arc<RequestAdapter>,
    /// Worker specs in roster order
    pub roster: Arc<Vec<WorkerSpec>>,
}

impl AppState {
    /// Build the default research team from configuration
    pub async fn from_config(config: AgoraConfig) -> Result<Self> {
        let coordinator = Coordinator::from_config(&config).await?;
        let roster = coordinator
            .workers()
            .iter()
            .map(|worker| worker.spec().clone())
            .collect();
        let adapter =
            RequestAdapter::new(Arc::new(coordinator)).with_deadline(config.research.deadline());

        Ok(Self {
            config: Arc::new(config),
            adapter: Arc::new(adapter),
            roster: Arc::new(roster),
        })
    }
}
