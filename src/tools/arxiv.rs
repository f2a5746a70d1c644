//! arXiv metadata search capability
//!
//! Queries the arXiv export API and returns title, authors, publication date,
//! abstract and the abstract/PDF links for each paper. Only metadata is
//! retrieved; this type has no way to download document content.

use crate::tools::SearchCapability;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

pub const DEFAULT_ARXIV_URL: &str = "https://export.arxiv.org/api";

/// Max characters of an abstract carried into the rendered result
const ABSTRACT_LIMIT: usize = 600;

/// Metadata for one paper in an arXiv Atom feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub published: String,
    pub summary: String,
    pub abstract_url: String,
    pub pdf_url: Option<String>,
}

impl PaperMetadata {
    fn render(&self, rank: usize) -> String {
        let year = self.published.get(..4).unwrap_or("n/a");
        let mut summary: String = self.summary.chars().take(ABSTRACT_LIMIT).collect();
        if self.summary.chars().count() > ABSTRACT_LIMIT {
            summary.push_str("...");
        }

        let mut text = format!(
            "{}. [{}]({}) | {} | {}",
            rank,
            self.title,
            self.abstract_url,
            self.authors.join(", "),
            year
        );
        if let Some(pdf) = &self.pdf_url {
            text.push_str(&format!("\n   PDF: [{}]({})", self.title, pdf));
        }
        if !summary.is_empty() {
            text.push_str(&format!("\n   Abstract: {}", summary));
        }
        text
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::Internal(format!("invalid selector '{}': {}", css, e)))
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(entry: &ElementRef<'_>, sel: &Selector) -> String {
    entry
        .select(sel)
        .next()
        .map(|el| collapse(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Parse an arXiv Atom feed into paper metadata.
pub fn parse_feed(feed: &str) -> Result<Vec<PaperMetadata>> {
    let document = Html::parse_document(feed);
    let entry_sel = selector("entry")?;
    let title_sel = selector("title")?;
    let summary_sel = selector("summary")?;
    let published_sel = selector("published")?;
    let id_sel = selector("id")?;
    let author_sel = selector("author name")?;
    let link_sel = selector("link")?;

    let papers = document
        .select(&entry_sel)
        .filter_map(|entry| {
            let title = first_text(&entry, &title_sel);
            let abstract_url = first_text(&entry, &id_sel);
            if title.is_empty() || abstract_url.is_empty() {
                return None;
            }

            let authors = entry
                .select(&author_sel)
                .map(|el| collapse(&el.text().collect::<String>()))
                .filter(|name| !name.is_empty())
                .collect();

            let pdf_url = entry
                .select(&link_sel)
                .find(|link| {
                    link.value().attr("title") == Some("pdf")
                        || link.value().attr("type") == Some("application/pdf")
                })
                .and_then(|link| link.value().attr("href"))
                .map(str::to_string);

            Some(PaperMetadata {
                title,
                authors,
                published: first_text(&entry, &published_sel),
                summary: first_text(&entry, &summary_sel),
                abstract_url,
                pdf_url,
            })
        })
        .collect();

    Ok(papers)
}

/// arXiv paper metadata search
pub struct ArxivMetadataSearch {
    client: reqwest::Client,
    base_url: String,
    num_results: usize,
}

impl ArxivMetadataSearch {
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
impl SearchCapability for ArxivMetadataSearch {
    fn name(&self) -> &str {
        "arxiv"
    }

    async fn search(&self, query: &str) -> Result<String> {
        let search_query = format!("all:{}", query);
        let max_results = self.num_results.to_string();
        let response = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Tool(format!("arxiv unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Tool(format!(
                "arxiv returned status {}",
                response.status()
            )));
        }

        let feed = response
            .text()
            .await
            .map_err(|e| AppError::Tool(format!("arxiv response unreadable: {}", e)))?;

        let papers = parse_feed(&feed)?;
        tracing::debug!(papers = papers.len(), "arxiv metadata search completed");

        Ok(papers
            .iter()
            .take(self.num_results)
            .enumerate()
            .map(|(i, paper)| paper.render(i + 1))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
