//! Hacker News search capability
//!
//! Queries the Algolia-backed Hacker News search API and renders each story
//! with its points, comment count and discussion link.

use crate::tools::SearchCapability;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HACKERNEWS_URL: &str = "https://hn.algolia.com/api/v1";
const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Story>,
}

#[derive(Debug, Deserialize)]
struct Story {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    points: Option<i64>,
    num_comments: Option<i64>,
}

impl Story {
    fn discussion_url(&self) -> String {
        format!("{}{}", ITEM_URL, self.object_id)
    }

    fn render(&self, rank: usize) -> Option<String> {
        let title = self.title.as_deref()?.trim();
        if title.is_empty() {
            return None;
        }
        let discussion = self.discussion_url();
        let mut line = format!(
            "{}. [{}]({}) | {} points | {} comments | by {}",
            rank,
            title,
            discussion,
            self.points.unwrap_or(0),
            self.num_comments.unwrap_or(0),
            self.author.as_deref().unwrap_or("unknown"),
        );
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            line.push_str(&format!("\n   Linked article: [{}]({})", title, url));
        }
        Some(line)
    }
}

/// Hacker News story search
pub struct HackerNewsSearch {
    client: reqwest::Client,
    base_url: String,
    num_results: usize,
}

impl HackerNewsSearch {
    pub fn new(base_url: impl Into<String>, num_results: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            num_results,
        }
    }
}

#[async_trait]
impl SearchCapability for HackerNewsSearch {
    fn name(&self) -> &str {
        "hackernews"
    }

    async fn search(&self, query: &str) -> Result<String> {
        let hits_per_page = self.num_results.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("query", query),
                ("tags", "story"),
                ("hitsPerPage", hits_per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Tool(format!("hackernews unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Tool(format!(
                "hackernews returned status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Tool(format!("hackernews returned malformed JSON: {}", e)))?;

        let lines: Vec<String> = body
            .hits
            .iter()
            .filter(|story| story.title.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .take(self.num_results)
            .enumerate()
            .filter_map(|(i, story)| story.render(i + 1))
            .collect();

        tracing::debug!(stories = lines.len(), "hackernews search completed");
        Ok(lines.join("\n"))
    }
}
