//! Worker specifications
//!
//! A [`WorkerSpec`] is the immutable description of one research worker: its
//! source domain, its persona, and the output contract its instructions
//! impose (minimum finding count, link format, mandatory summary table).

use crate::types::{AgentSummary, Capability};
use serde::{Deserialize, Serialize};

/// Schema of the summary table a worker must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSchema {
    /// Minimum number of distinct findings requested
    pub min_findings: usize,
    /// Label used in the mandatory `[Label](URL)` link format
    pub link_label: String,
    /// Column headers of the mandatory summary table
    pub table_columns: Vec<String>,
}

impl OutputSchema {
    /// Markdown header and separator rows for the summary table
    pub fn table_header(&self) -> String {
        let header = format!("| {} |", self.table_columns.join(" | "));
        let separator = format!(
            "|{}|",
            self.table_columns
                .iter()
                .map(|c| "-".repeat(c.len() + 2))
                .collect::<Vec<_>>()
                .join("|")
        );
        format!("{}\n{}", header, separator)
    }

    pub fn link_format(&self) -> String {
        format!("[{}](URL)", self.link_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSpec {
    pub name: String,
    pub role: String,
    pub capability: Capability,
    /// Opening persona paragraph
    pub persona: String,
    /// Details to provide for each finding
    pub details: Vec<String>,
    /// Sections the response should be organised into
    pub structure: Vec<String>,
    /// Hard rules the worker must follow (e.g. metadata-only access)
    pub restrictions: Vec<String>,
    pub schema: OutputSchema,
}

impl WorkerSpec {
    /// Render the full system instructions for this worker
    pub fn render_instructions(&self) -> String {
        let mut out = format!("Your name is {}.\n{}\n", self.name, self.persona.trim());

        for rule in &self.restrictions {
            out.push_str(&format!("\n**CRITICAL: {}**\n", rule));
        }

        if !self.details.is_empty() {
            out.push_str("\nFor each finding, provide:\n");
            for detail in &self.details {
                out.push_str(&format!("- {}\n", detail));
            }
        }

        if !self.structure.is_empty() {
            out.push_str("\nStructure your response with:\n");
            for section in &self.structure {
                out.push_str(&format!("- {}\n", section));
            }
        }

        out.push_str(&format!(
            "\nInclude at least {} specific findings with detailed analysis.\n",
            self.schema.min_findings
        ));
        out.push_str(&format!(
            "\n**MANDATORY: Create a summary table with the following columns:**\n{}\n",
            self.schema.table_header()
        ));
        out.push_str(&format!(
            "\n**MANDATORY: Always include direct links in this format: {}**\n",
            self.schema.link_format()
        ));
        out.push_str("**MANDATORY: Use markdown formatting for better readability**\n");
        out
    }
}

impl From<&WorkerSpec> for AgentSummary {
    fn from(spec: &WorkerSpec) -> Self {
        Self {
            name: spec.name.clone(),
            role: spec.role.clone(),
            capability: spec.capability,
            min_findings: spec.schema.min_findings,
            table_columns: spec.schema.table_columns.clone(),
        }
    }
}
