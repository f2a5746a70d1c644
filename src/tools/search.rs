//! Web search capability using daedra
//!
//! daedra uses DuckDuckGo as the search backend. Community and microblog
//! workers reach their platforms through `site:` scoping.

use crate::tools::{render_hits, SearchCapability, SearchHit};
use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Web search, optionally restricted to a set of sites.
pub struct WebSearch {
    name: String,
    sites: Vec<String>,
    num_results: usize,
}

impl WebSearch {
    /// Unscoped web search
    pub fn new(num_results: usize) -> Self {
        Self {
            name: "web_search".to_string(),
            sites: Vec::new(),
            num_results,
        }
    }

    /// Web search restricted to the given sites (e.g. `reddit.com`)
    pub fn scoped(name: &str, sites: &[&str], num_results: usize) -> Self {
        Self {
            name: name.to_string(),
            sites: sites.iter().map(|s| s.to_string()).collect(),
            num_results,
        }
    }

    /// Build the query string sent to the search backend
    pub fn scoped_query(&self, query: &str) -> String {
        match self.sites.as_slice() {
            [] => query.to_string(),
            [site] => format!("{} site:{}", query, site),
            sites => {
                let filter = sites
                    .iter()
                    .map(|s| format!("site:{}", s))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("{} ({})", query, filter)
            }
        }
    }
}

#[async_trait]
impl SearchCapability for WebSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<String> {
        let search_args = daedra::SearchArgs {
            query: self.scoped_query(query),
            options: Some(daedra::SearchOptions {
                num_results: self.num_results,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Tool(format!("{}: search failed: {}", self.name, e)))?;

        let hits: Vec<SearchHit> = response
            .data
            .iter()
            .take(self.num_results)
            .map(|r| SearchHit {
                title: r.title.to_string(),
                url: r.url.to_string(),
                snippet: r.description.to_string(),
            })
            .collect();

        tracing::debug!(capability = %self.name, hits = hits.len(), "web search completed");
        Ok(render_hits(&hits))
    }
}
