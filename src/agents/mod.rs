//! Research workers
//!
//! A worker accepts a topic and returns a [`Finding`](crate::types::Finding)
//! gathered from one source domain. All workers share one implementation,
//! [`ResearchWorker`], and differ only by their [`WorkerSpec`].

/// Default roster of four source-bound workers.
pub mod roster;
/// Worker specifications and output schemas.
pub mod spec;
/// The generic research worker.
pub mod worker;

use crate::llm::LLMClient;
use crate::tools::CapabilityRegistry;
use crate::types::{Finding, Query, Result};
use async_trait::async_trait;
use std::sync::Arc;

// Re-export commonly used types
pub use roster::default_roster;
pub use spec::{OutputSchema, WorkerSpec};
pub use worker::ResearchWorker;

/// Base trait for all research agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Research the query and return this agent's finding
    async fn research(&self, query: &Query) -> Result<Finding>;

    /// The spec this agent was built from
    fn spec(&self) -> &WorkerSpec;

    /// Agent display name
    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// Build one worker per spec, resolving each capability from the registry.
///
/// Fails if any spec names a capability the registry cannot serve.
pub fn build_workers(
    roster: &[WorkerSpec],
    registry: &CapabilityRegistry,
    llm: Arc<dyn LLMClient>,
) -> Result<Vec<Arc<dyn Agent>>> {
    roster
        .iter()
        .map(|spec| {
            let source = registry.get(spec.capability)?;
            let worker: Arc<dyn Agent> =
                Arc::new(ResearchWorker::new(spec.clone(), source, llm.clone()));
            Ok(worker)
        })
        .collect()
}
