//! Search Capabilities for Research Workers
//!
//! Every research worker is bound to exactly one external information source.
//! Sources are exposed through the narrow [`SearchCapability`] trait:
//! `search(query) -> text`. What a capability fetches and how it ranks results
//! is its own business; workers only see the returned text.
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - DuckDuckGo web search, optionally scoped to sites
//! - [`hackernews`](crate::tools::hackernews) - Hacker News story search
//! - [`arxiv`](crate::tools::arxiv) - arXiv paper metadata search
//! - [`registry`](crate::tools::registry) - Capability-tag to source mapping
//!
//! # Scholarly sources
//!
//! The arXiv capability only has a metadata search. There is no document
//! download method, so a scholarly worker cannot fetch full papers no matter
//! what its instructions say.

use crate::types::Result;
use async_trait::async_trait;

/// arXiv metadata search.
pub mod arxiv;
/// Hacker News story search.
pub mod hackernews;
/// Capability registry.
pub mod registry;
/// Web search using DuckDuckGo.
pub mod search;

pub use registry::CapabilityRegistry;

/// A read-only external information source.
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Short identifier used in logs and failure notes
    fn name(&self) -> &str;

    /// Search the source and return the results rendered as markdown text.
    ///
    /// An empty string means the source was reachable but had nothing.
    async fn search(&self, query: &str) -> Result<String>;
}

/// One search hit, rendered as a markdown bullet with an inline link.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Render hits as a numbered markdown list in `[Title](URL)` form.
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let snippet = hit.snippet.split_whitespace().collect::<Vec<_>>().join(" ");
            if snippet.is_empty() {
                format!("{}. [{}]({})", i + 1, hit.title.trim(), hit.url)
            } else {
                format!("{}. [{}]({})\n   {}", i + 1, hit.title.trim(), hit.url, snippet)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
