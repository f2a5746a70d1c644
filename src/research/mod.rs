//! Multi-Agent Research Coordination
//!
//! This module coordinates the research workers that together answer one
//! query and merges their output into a single report.
//!
//! # Architecture
//!
//! - [`coordinator::Coordinator`] - Dispatches workers and runs synthesis
//! - [`context::SharedContext`] - Run-scoped, roster-ordered worker summaries
//! - [`summarizer`] - Bounded-length compression of each finding
//! - [`policy::SynthesisPolicy`] - Report structure and its enforcement
//!
//! # Usage
//!
//! ```ignore
//! use agora::research::coordinator::Coordinator;
//! use std::time::Duration;
//!
//! let coordinator = Coordinator::from_config(&config).await?;
//! let query = Query::new("Impact of AI on jobs")?;
//! let report = coordinator.run(&query, Duration::from_secs(600)).await?;
//!
//! println!("{}", report.text);
//! for link in report.links {
//!     println!("- {}", link);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Solicit** - Every worker researches the same query independently
//! 2. **Compress** - Each finding is summarized to a fixed budget as it arrives
//! 3. **Record** - Summaries (or failure notes) land in roster-indexed slots
//! 4. **Synthesize** - One six-section report is written from the shared context
//! 5. **Enforce** - Sections, tables and links are checked before returning

/// Run-scoped shared context.
pub mod context;
/// Research task coordination and multi-source aggregation.
pub mod coordinator;
/// Link, table and heading inspection.
pub mod markdown;
/// Report structure and synthesis instructions.
pub mod policy;
/// Finding compression.
pub mod summarizer;

use crate::types::{Query, Result};
use async_trait::async_trait;
use std::time::Duration;

pub use coordinator::{Coordinator, CoordinatorOptions};
pub use policy::{Report, SynthesisPolicy, WorkerGap};

/// Anything that can turn a query into a report within a deadline.
#[async_trait]
pub trait ResearchTeam: Send + Sync {
    async fn run(&self, query: &Query, deadline: Duration) -> Result<Report>;
}
