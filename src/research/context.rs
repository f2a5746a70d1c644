//! Run-scoped shared context.
//!
//! The coordinator owns one [`SharedContext`] per query. Each roster position
//! has exactly one slot; a slot is written once, with either a compressed
//! summary or a failure note. Reading always walks slots in roster order, so
//! the synthesis input does not depend on which worker finished first.

use crate::types::{AppError, Capability, Query, Result};
use serde::{Deserialize, Serialize};

/// One worker's contribution to the shared context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContextEntry {
    /// Compressed summary of a successful finding
    Summary {
        worker: String,
        capability: Capability,
        summary: String,
        /// Links harvested from the raw finding, before compression
        links: Vec<String>,
    },
    /// The worker failed; its reason stands in for a summary
    Gap {
        worker: String,
        capability: Capability,
        reason: String,
    },
}

impl ContextEntry {
    pub fn worker(&self) -> &str {
        match self {
            ContextEntry::Summary { worker, .. } | ContextEntry::Gap { worker, .. } => worker,
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            ContextEntry::Summary { capability, .. } | ContextEntry::Gap { capability, .. } => {
                *capability
            }
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, ContextEntry::Gap { .. })
    }

    pub fn links(&self) -> &[String] {
        match self {
            ContextEntry::Summary { links, .. } => links,
            ContextEntry::Gap { .. } => &[],
        }
    }
}

#[derive(Debug)]
pub struct SharedContext {
    query: Query,
    slots: Vec<Option<ContextEntry>>,
}

impl SharedContext {
    /// Fresh context with one empty slot per roster position
    pub fn new(query: Query, roster_len: usize) -> Self {
        Self {
            query,
            slots: vec![None; roster_len],
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Write the entry for roster position `index`.
    ///
    /// Slots are append-only: writing an occupied or out-of-range slot fails.
    pub fn record(&mut self, index: usize, entry: ContextEntry) -> Result<()> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or_else(|| {
            AppError::Internal(format!("context slot {} out of range ({} workers)", index, len))
        })?;
        if let Some(existing) = slot {
            return Err(AppError::Internal(format!(
                "context slot {} already holds an entry for '{}'",
                index,
                existing.worker()
            )));
        }
        *slot = Some(entry);
        Ok(())
    }

    /// Roster positions that have not been written yet
    pub fn pending(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Recorded entries in roster order
    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.slots.iter().flatten()
    }

    pub fn success_count(&self) -> usize {
        self.entries().filter(|e| !e.is_gap()).count()
    }

    pub fn contributors(&self) -> Vec<String> {
        self.entries()
            .filter(|e| !e.is_gap())
            .map(|e| e.worker().to_string())
            .collect()
    }

    /// (worker, reason) for every failed worker
    pub fn gaps(&self) -> Vec<(String, String)> {
        self.entries()
            .filter_map(|e| match e {
                ContextEntry::Gap { worker, reason, .. } => Some((worker.clone(), reason.clone())),
                ContextEntry::Summary { .. } => None,
            })
            .collect()
    }

    /// (worker, link) pairs in roster order; a link is attributed to the first worker citing it
    pub fn attributed_links(&self) -> Vec<(String, String)> {
        let mut seen: Vec<(String, String)> = Vec::new();
        for entry in self.entries() {
            for link in entry.links() {
                if !seen.iter().any(|(_, l)| l == link) {
                    seen.push((entry.worker().to_string(), link.clone()));
                }
            }
        }
        seen
    }

    pub fn links(&self) -> Vec<String> {
        self.attributed_links().into_iter().map(|(_, l)| l).collect()
    }

    /// Render the context as the synthesis step's input
    pub fn render(&self) -> String {
        self.entries()
            .enumerate()
            .map(|(i, entry)| match entry {
                ContextEntry::Summary {
                    worker,
                    capability,
                    summary,
                    links,
                } => {
                    let mut block = format!("### {}. {} ({})\n{}", i + 1, worker, capability, summary);
                    if !links.is_empty() {
                        block.push_str("\n\nSource links:\n");
                        for link in links {
                            block.push_str(&format!("- {}\n", link));
                        }
                    }
                    block.trim_end().to_string()
                }
                ContextEntry::Gap {
                    worker,
                    capability,
                    reason,
                } => format!(
                    "### {}. {} ({})\n_No findings: {}_",
                    i + 1,
                    worker,
                    capability,
                    reason
                ),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
