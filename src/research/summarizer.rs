//! Compress-as-you-go summarization.
//!
//! Every finding is reduced to at most `budget` characters before it enters
//! the shared context. The extractive summarizer is deterministic and needs
//! no model; the LLM summarizer asks the model for a summary, clamps the reply
//! to the same budget, and falls back to extraction when the model fails.

use crate::llm::LLMClient;
use crate::research::markdown::clamp_chars;
use crate::types::{Finding, Result};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `finding` in at most `budget` characters
    async fn summarize(&self, finding: &Finding, budget: usize) -> Result<String>;
}

/// Keeps table rows first, then link-bearing lines, then headings, then prose,
/// emitting the chosen lines in their original order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    fn priority(line: &str) -> u8 {
        let line = line.trim_start();
        if line.starts_with('|') {
            0
        } else if line.contains("http://") || line.contains("https://") {
            1
        } else if line.starts_with('#') || line.starts_with("**") {
            2
        } else {
            3
        }
    }

    pub fn compress(&self, text: &str, budget: usize) -> String {
        let text = text.trim();
        if text.chars().count() <= budget {
            return text.to_string();
        }

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        let mut keep = vec![false; lines.len()];
        let mut used = 0usize;

        for level in 0..=3 {
            for (i, line) in lines.iter().enumerate() {
                if keep[i] || Self::priority(line) != level {
                    continue;
                }
                // +1 for the joining newline
                let cost = line.chars().count() + 1;
                if used + cost <= budget + 1 {
                    keep[i] = true;
                    used += cost;
                }
            }
        }

        let kept: Vec<&str> = lines
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(l, _)| *l)
            .collect();

        if kept.is_empty() {
            clamp_chars(text, budget)
        } else {
            clamp_chars(&kept.join("\n"), budget)
        }
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, finding: &Finding, budget: usize) -> Result<String> {
        Ok(self.compress(&finding.body, budget))
    }
}

/// Model-backed summarizer with an extractive fallback
pub struct LlmSummarizer {
    llm: Arc<dyn LLMClient>,
    fallback: ExtractiveSummarizer,
}

impl LlmSummarizer {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self {
            llm,
            fallback: ExtractiveSummarizer,
        }
    }

    fn prompt(finding: &Finding, budget: usize) -> String {
        format!(
            "Summarize the key findings of the {} below in at most {} characters.\n\
             Keep the summary table (trim rows if needed), every direct link, \
             quantitative metrics and the overall sentiment. Do not add new facts.\n\n{}",
            finding.worker, budget, finding.body
        )
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, finding: &Finding, budget: usize) -> Result<String> {
        if finding.body.trim().chars().count() <= budget {
            return Ok(finding.body.trim().to_string());
        }

        match self.llm.generate(&Self::prompt(finding, budget)).await {
            Ok(summary) if !summary.trim().is_empty() => Ok(clamp_chars(summary.trim(), budget)),
            Ok(_) => {
                tracing::warn!(worker = %finding.worker, "summarizer returned nothing, using extractive fallback");
                Ok(self.fallback.compress(&finding.body, budget))
            }
            Err(e) => {
                tracing::warn!(worker = %finding.worker, error = %e, "summarizer failed, using extractive fallback");
                Ok(self.fallback.compress(&finding.body, budget))
            }
        }
    }
}
