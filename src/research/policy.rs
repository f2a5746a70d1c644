//! Synthesis policy and the final report.
//!
//! [`SynthesisPolicy`] is the instruction set for the synthesis step and the
//! checker applied to its output. A synthesis that is empty or lacks the
//! required sections is rejected; dropped links and missing tables are
//! repaired with deterministic appendices where possible.

use crate::research::context::SharedContext;
use crate::research::markdown::{count_tables, extract_links, heading_title};
use std::collections::HashSet;
use crate::types::{AppError, Query, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One mandatory report section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    /// Instruction shown to the model for this section
    pub guidance: &'static str,
    /// Lowercase heading prefixes accepted as this section
    pub aliases: &'static [&'static str],
}

impl Section {
    fn matches(&self, heading: &str) -> bool {
        heading.starts_with(&self.title.to_lowercase())
            || self.aliases.iter().any(|a| heading.starts_with(a))
    }
}

pub const REPORT_SECTIONS: [Section; 6] = [
    Section {
        title: "Executive Summary",
        guidance: "2-3 paragraph overview",
        aliases: &[],
    },
    Section {
        title: "Detailed Findings by Platform",
        guidance: "Each researcher's findings with their tables",
        aliases: &["detailed findings"],
    },
    Section {
        title: "Cross-Platform Analysis",
        guidance: "Comparison and synthesis tables",
        aliases: &["cross platform analysis"],
    },
    Section {
        title: "Impact Assessment",
        guidance: "Positive/negative impacts in table format",
        aliases: &["impact analysis"],
    },
    Section {
        title: "Recommendations",
        guidance: "Actionable insights",
        aliases: &[],
    },
    Section {
        title: "Conclusion",
        guidance: "Summary of key takeaways",
        aliases: &["conclusions"],
    },
];

/// A worker that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorkerGap {
    pub worker: String,
    pub reason: String,
}

/// The final synthesized answer for one query
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    #[schema(value_type = String)]
    pub query: Query,
    /// Markdown report text
    pub text: String,
    /// Workers whose findings made it into the report, in roster order
    pub contributors: Vec<String>,
    pub gaps: Vec<WorkerGap>,
    /// Every source link collected from workers
    pub links: Vec<String>,
    pub table_count: usize,
    pub generated_at: DateTime<Utc>,
}

enum SectionError {
    Missing(Vec<&'static str>),
    OutOfOrder,
}

#[derive(Debug, Clone)]
pub struct SynthesisPolicy {
    sections: Vec<Section>,
    min_tables: usize,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            sections: REPORT_SECTIONS.to_vec(),
            min_tables: 3,
        }
    }
}

impl SynthesisPolicy {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn min_tables(&self) -> usize {
        self.min_tables
    }

    /// System instructions for the synthesis step
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(
            "You are a discussion master specializing in comprehensive, well-structured analysis.\n\
             You are given a research topic and condensed findings from several researchers, \
             each working a different platform. Synthesize them into one holistic answer.\n\n\
             **FORMATTING REQUIREMENTS:**\n\
             - Use markdown formatting for better readability\n\
             - Use bullet points and numbered lists for organization\n\
             - Include direct links to sources in [Title](URL) format\n\
             - Provide specific examples, quantitative data and metrics when available\n\
             - Provide both positive and negative perspectives with balanced analysis\n\
             - Condense long findings; do not paste researcher output verbatim\n\
             - If a researcher has no findings, say so in its platform subsection\n\n\
             **MANDATORY FINAL OUTPUT STRUCTURE (use these exact headings, in order):**\n",
        );
        for (i, section) in self.sections.iter().enumerate() {
            prompt.push_str(&format!(
                "## {}. {} - {}\n",
                i + 1,
                section.title,
                section.guidance
            ));
        }
        prompt.push_str(&format!(
            "\n**MANDATORY: Include ALL direct links provided by the researchers**\n\
             **MANDATORY: Create at least {} summary tables in the final response**\n",
            self.min_tables
        ));
        prompt
    }

    /// User prompt for the synthesis step
    pub fn synthesis_prompt(&self, context: &SharedContext) -> String {
        format!(
            "Research topic: {}\n\nCondensed findings by platform:\n\n{}\n\n\
             Write the final report now.",
            context.query(),
            context.render()
        )
    }

    /// Match every section to a heading, each after the previous section's.
    ///
    /// A later heading that merely repeats a section name (a subheading such
    /// as "Recommendations from Reddit users") is not mistaken for it.
    fn locate_sections(&self, text: &str) -> std::result::Result<(), SectionError> {
        let headings: Vec<String> = text.lines().filter_map(heading_title).collect();

        let missing: Vec<&'static str> = self
            .sections
            .iter()
            .filter(|section| !headings.iter().any(|h| section.matches(h)))
            .map(|section| section.title)
            .collect();
        if !missing.is_empty() {
            return Err(SectionError::Missing(missing));
        }

        let mut cursor = 0;
        for section in &self.sections {
            match headings[cursor..].iter().position(|h| section.matches(h)) {
                Some(offset) => cursor += offset + 1,
                None => return Err(SectionError::OutOfOrder),
            }
        }
        Ok(())
    }

    /// Check the synthesized text and turn it into a [`Report`].
    pub fn finalize(&self, synthesis: &str, context: &SharedContext) -> Result<Report> {
        let mut text = synthesis.trim().to_string();
        if text.is_empty() {
            return Err(AppError::Aggregation(
                "synthesis produced no output".to_string(),
            ));
        }

        self.locate_sections(&text).map_err(|e| match e {
            SectionError::Missing(missing) => AppError::Aggregation(format!(
                "synthesis is missing required sections: {}",
                missing.join(", ")
            )),
            SectionError::OutOfOrder => {
                AppError::Aggregation("synthesis sections are out of order".to_string())
            }
        })?;

        let attributed = context.attributed_links();
        // Exact match only: citing a deeper URL does not preserve its prefix
        let cited: HashSet<String> = extract_links(&text).into_iter().collect();
        let dropped: Vec<&(String, String)> = attributed
            .iter()
            .filter(|(_, link)| !cited.contains(link))
            .collect();
        let mut indexed_links = false;
        if !dropped.is_empty() {
            tracing::debug!(dropped = dropped.len(), "restoring links omitted by synthesis");
            text.push_str("\n\n### Source Links\n\n| # | Researcher | Link |\n|---|------------|------|\n");
            for (i, (worker, link)) in dropped.iter().enumerate() {
                text.push_str(&format!("| {} | {} | {} |\n", i + 1, worker, link));
            }
            indexed_links = dropped.len() == attributed.len();
        }

        if count_tables(&text) < self.min_tables {
            text.push_str("\n\n### Platform Coverage\n\n| Researcher | Platform | Status | Links |\n|------------|----------|--------|-------|\n");
            for entry in context.entries() {
                let status = if entry.is_gap() { "no findings" } else { "contributed" };
                text.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    entry.worker(),
                    entry.capability(),
                    status,
                    entry.links().len()
                ));
            }
        }

        if count_tables(&text) < self.min_tables && !attributed.is_empty() && !indexed_links {
            text.push_str("\n\n### Source Index\n\n| # | Researcher | Link |\n|---|------------|------|\n");
            for (i, (worker, link)) in attributed.iter().enumerate() {
                text.push_str(&format!("| {} | {} | {} |\n", i + 1, worker, link));
            }
        }

        let table_count = count_tables(&text);
        if table_count < self.min_tables {
            return Err(AppError::Aggregation(format!(
                "synthesis produced {} tables; at least {} are required",
                table_count, self.min_tables
            )));
        }

        Ok(Report {
            query: context.query().clone(),
            text: text.trim_end().to_string(),
            contributors: context.contributors(),
            gaps: context
                .gaps()
                .into_iter()
                .map(|(worker, reason)| WorkerGap { worker, reason })
                .collect(),
            links: context.links(),
            table_count,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::context::ContextEntry;
    use crate::types::Capability;

    fn context_with(links: &[&str]) -> SharedContext {
        let mut ctx = SharedContext::new(Query::new("AI and jobs").unwrap(), 2);
        ctx.record(
            0,
            ContextEntry::Summary {
                worker: "Reddit Researcher".to_string(),
                capability: Capability::CommunityForum,
                summary: "mixed sentiment".to_string(),
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        )
        .unwrap();
        ctx.record(
            1,
            ContextEntry::Gap {
                worker: "Twitter Researcher".to_string(),
                capability: Capability::Microblog,
                reason: "source unavailable".to_string(),
            },
        )
        .unwrap();
        ctx
    }

    fn table() -> &'static str {
        "| A | B |\n|---|---|\n| 1 | 2 |\n"
    }

    fn report_with_tables(n: usize, extra: &str) -> String {
        let tables = (0..n).map(|_| table()).collect::<Vec<_>>().join("\n");
        format!(
            "## 1. Executive Summary\nOverview.\n\n## 2. Detailed Findings by Platform\n{}\n{}\n\
             ## 3. Cross-Platform Analysis\nx\n## 4. Impact Assessment\ny\n\
             ## 5. Recommendations\nz\n## 6. Conclusion\ndone",
            tables, extra
        )
    }

    #[test]
    fn test_system_prompt_lists_sections_in_order() {
        let prompt = SynthesisPolicy::default().system_prompt();
        let exec = prompt.find("## 1. Executive Summary").unwrap();
        let conclusion = prompt.find("## 6. Conclusion").unwrap();
        assert!(exec < conclusion);
        assert!(prompt.contains("at least 3 summary tables"));
    }

    #[test]
    fn test_synthesis_prompt_contains_context() {
        let ctx = context_with(&["https://reddit.com/r/a/1"]);
        let prompt = SynthesisPolicy::default().synthesis_prompt(&ctx);
        assert!(prompt.starts_with("Research topic: AI and jobs"));
        assert!(prompt.contains("Reddit Researcher"));
        assert!(prompt.contains("_No findings: source unavailable_"));
    }

    #[test]
    fn test_well_formed_report_passes_unchanged() {
        let ctx = context_with(&["https://reddit.com/r/a/1"]);
        let synthesis = report_with_tables(3, "[Thread](https://reddit.com/r/a/1)");
        let report = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap();

        assert_eq!(report.text, synthesis);
        assert_eq!(report.table_count, 3);
        assert_eq!(report.contributors, vec!["Reddit Researcher"]);
        assert_eq!(report.gaps[0].worker, "Twitter Researcher");
        assert_eq!(report.links, vec!["https://reddit.com/r/a/1"]);
    }

    #[test]
    fn test_dropped_links_are_restored() {
        let ctx = context_with(&["https://reddit.com/r/a/1", "https://reddit.com/r/a/2"]);
        let synthesis = report_with_tables(3, "[Thread](https://reddit.com/r/a/1)");
        let report = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap();

        assert!(report.text.contains("### Source Links"));
        assert!(report.text.contains("| 1 | Reddit Researcher | https://reddit.com/r/a/2 |"));
        assert_eq!(report.table_count, 4);
    }

    #[test]
    fn test_missing_tables_are_backfilled() {
        let ctx = context_with(&["https://reddit.com/r/a/1"]);
        let synthesis = report_with_tables(1, "[Thread](https://reddit.com/r/a/1)");
        let report = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap();

        assert!(report.text.contains("### Platform Coverage"));
        assert!(report.text.contains("| Twitter Researcher | microblog | no findings | 0 |"));
        assert!(report.text.contains("### Source Index"));
        assert_eq!(report.table_count, 3);
    }

    #[test]
    fn test_too_few_tables_without_links_is_aggregation_error() {
        let ctx = context_with(&[]);
        let synthesis = report_with_tables(0, "");
        let err = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap_err();
        assert!(matches!(err, AppError::Aggregation(_)));
        assert!(err.to_string().contains("tables"));
    }

    #[test]
    fn test_missing_sections_rejected() {
        let ctx = context_with(&[]);
        let err = SynthesisPolicy::default()
            .finalize("## Executive Summary\nonly this", &ctx)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing required sections"));
        assert!(msg.contains("Conclusion"));
        assert!(!msg.contains("Executive Summary"));
    }

    #[test]
    fn test_out_of_order_sections_rejected() {
        let ctx = context_with(&[]);
        let synthesis = report_with_tables(3, "")
            .replace("## 1. Executive Summary", "## 1. Placeholder")
            + "\n## Executive Summary\nlate";
        let err = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn test_empty_synthesis_rejected() {
        let ctx = context_with(&[]);
        let err = SynthesisPolicy::default().finalize("  \n ", &ctx).unwrap_err();
        assert!(err.to_string().contains("no output"));
    }

    #[test]
    fn test_bold_headings_and_aliases_accepted() {
        let ctx = context_with(&[]);
        let synthesis = format!(
            "**1. Executive Summary**\n\n**2. Detailed Findings**\n{t}\n{t}\n{t}\n\
             **3. Cross Platform Analysis**\n**4. Impact Analysis**\n\
             **5. Recommendations**\n**6. Conclusion**",
            t = table()
        );
        assert!(SynthesisPolicy::default().finalize(&synthesis, &ctx).is_ok());
    }

    #[test]
    fn test_link_cited_only_as_prefix_is_restored() {
        let ctx = context_with(&["https://x.com/a"]);
        let synthesis = report_with_tables(3, "[Post](https://x.com/a/status/9)");
        let report = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap();

        assert!(report.text.contains("### Source Links"));
        assert!(report.text.contains("| 1 | Reddit Researcher | https://x.com/a |"));
        assert!(extract_links(&report.text).contains(&"https://x.com/a".to_string()));
    }

    #[test]
    fn test_subheading_repeating_a_section_name_is_accepted() {
        let ctx = context_with(&[]);
        let synthesis = report_with_tables(3, "### Recommendations from Reddit users
- upskill
");
        let report = SynthesisPolicy::default().finalize(&synthesis, &ctx).unwrap();
        assert_eq!(report.table_count, 3);
    }
}
