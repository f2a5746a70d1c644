//! Research worker implementation
//!
//! One generic worker type, parameterized by a [`WorkerSpec`]. The spec
//! decides the source domain and the instructions; the worker only wires a
//! search capability to the generative model.

use crate::agents::spec::WorkerSpec;
use crate::agents::Agent;
use crate::llm::LLMClient;
use crate::tools::SearchCapability;
use crate::types::{AppError, Finding, Query, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// A research worker bound to one source through its capability
pub struct ResearchWorker {
    spec: WorkerSpec,
    /// Source this worker reads from
    source: Arc<dyn SearchCapability>,
    /// Model used to turn search evidence into a finding
    llm: Arc<dyn LLMClient>,
    /// Instructions rendered once from the spec
    instructions: String,
}

impl ResearchWorker {
    pub fn new(
        spec: WorkerSpec,
        source: Arc<dyn SearchCapability>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        let instructions = spec.render_instructions();
        Self {
            spec,
            source,
            llm,
            instructions,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    fn failure(&self, reason: impl Into<String>) -> AppError {
        AppError::Worker {
            worker: self.spec.name.clone(),
            reason: reason.into(),
        }
    }

    fn build_prompt(&self, query: &Query, evidence: &str) -> String {
        format!(
            "Topic: {}\n\nSearch results from {}:\n{}\n\n\
             Research the topic using only the search results above. \
             Follow your instructions, including the summary table and the link format.",
            query,
            self.source.name(),
            evidence
        )
    }
}

#[async_trait]
impl Agent for ResearchWorker {
    async fn research(&self, query: &Query) -> Result<Finding> {
        tracing::debug!(worker = %self.spec.name, source = self.source.name(), "searching");

        let evidence = self.source.search(query.as_str()).await.map_err(|e| match e {
            AppError::Tool(reason) => self.failure(format!("source unavailable: {}", reason)),
            other => self.failure(other.to_string()),
        })?;

        if evidence.trim().is_empty() {
            return Err(self.failure(format!("{} returned no results", self.source.name())));
        }

        let prompt = self.build_prompt(query, &evidence);
        let body = self
            .llm
            .generate_with_system(&self.instructions, &prompt)
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        if body.trim().is_empty() {
            return Err(self.failure("model returned an empty finding"));
        }

        Ok(Finding::new(&self.spec.name, body.trim()))
    }

    fn spec(&self) -> &WorkerSpec {
        &self.spec
    }
}
