use crate::tools::arxiv::ArxivMetadataSearch;
use crate::tools::hackernews::HackerNewsSearch;
use crate::tools::search::WebSearch;
use crate::tools::SearchCapability;
use crate::types::{AppError, Capability, Result};
use crate::utils::config::SourcesConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each capability tag to the source that backs it.
pub struct CapabilityRegistry {
    sources: HashMap<Capability, Arc<dyn SearchCapability>>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Create a registry with the standard source for every capability
    pub fn with_default_sources(config: &SourcesConfig, num_results: usize) -> Self {
        let mut registry = Self::new();

        registry.register(
            Capability::CommunityForum,
            Arc::new(WebSearch::scoped("reddit_search", &["reddit.com"], num_results)),
        );
        registry.register(
            Capability::TechnicalForum,
            Arc::new(HackerNewsSearch::new(&config.hackernews_url, num_results)),
        );
        registry.register(
            Capability::ScholarlyIndex,
            Arc::new(ArxivMetadataSearch::new(&config.arxiv_url, num_results)),
        );
        registry.register(
            Capability::Microblog,
            Arc::new(WebSearch::scoped(
                "microblog_search",
                &["x.com", "twitter.com"],
                num_results,
            )),
        );

        registry
    }

    /// Register (or replace) the source for a capability
    pub fn register(&mut self, capability: Capability, source: Arc<dyn SearchCapability>) {
        self.sources.insert(capability, source);
    }

    pub fn get(&self, capability: Capability) -> Result<Arc<dyn SearchCapability>> {
        self.sources.get(&capability).cloned().ok_or_else(|| {
            AppError::Config(format!("No source registered for capability '{}'", capability))
        })
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.sources.contains_key(&capability)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
