use crate::{
    agents::{build_workers, default_roster, Agent},
    llm::{LLMClient, LLMClientFactory},
    research::{
        context::{ContextEntry, SharedContext},
        markdown::{clamp_chars, extract_links},
        policy::{Report, SynthesisPolicy},
        summarizer::{ExtractiveSummarizer, LlmSummarizer, Summarizer},
        ResearchTeam,
    },
    tools::CapabilityRegistry,
    types::{AppError, Query, Result},
    utils::config::{AgoraConfig, SummarizerKind},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Tuning knobs for one coordinator
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorOptions {
    /// Max characters of each worker summary in the shared context
    pub summary_budget: usize,
    /// Max workers researching at the same time
    pub max_concurrency: usize,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            summary_budget: 1200,
            max_concurrency: 4,
        }
    }
}

/// Runs the research team: solicit every worker, compress each finding into
/// the shared context, then synthesize one report.
pub struct Coordinator {
    workers: Vec<Arc<dyn Agent>>,
    summarizer: Arc<dyn Summarizer>,
    llm: Arc<dyn LLMClient>,
    policy: SynthesisPolicy,
    options: CoordinatorOptions,
}

impl Coordinator {
    pub fn new(
        workers: Vec<Arc<dyn Agent>>,
        summarizer: Arc<dyn Summarizer>,
        llm: Arc<dyn LLMClient>,
    ) -> Self {
        Self {
            workers,
            summarizer,
            llm,
            policy: SynthesisPolicy::default(),
            options: CoordinatorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CoordinatorOptions) -> Self {
        self.options = CoordinatorOptions {
            summary_budget: options.summary_budget.max(1),
            max_concurrency: options.max_concurrency.max(1),
        };
        self
    }

    pub fn with_policy(mut self, policy: SynthesisPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Assemble the default four-worker team from configuration
    pub async fn from_config(config: &AgoraConfig) -> Result<Self> {
        let llm = LLMClientFactory::new(config.llm.to_provider()?)
            .create_shared()
            .await?;
        let registry = CapabilityRegistry::with_default_sources(
            &config.sources,
            config.research.results_per_source,
        );
        let workers = build_workers(&default_roster(), &registry, llm.clone())?;

        let summarizer: Arc<dyn Summarizer> = match config.research.summarizer {
            SummarizerKind::Extractive => Arc::new(ExtractiveSummarizer),
            SummarizerKind::Llm => Arc::new(LlmSummarizer::new(llm.clone())),
        };

        Ok(Self::new(workers, summarizer, llm).with_options(CoordinatorOptions {
            summary_budget: config.research.summary_budget,
            max_concurrency: config.research.max_concurrency,
        }))
    }

    pub fn workers(&self) -> &[Arc<dyn Agent>] {
        &self.workers
    }

    /// Research `query` and return the synthesized report.
    ///
    /// # Errors
    ///
    /// - [`AppError::Timeout`] if `deadline` elapses first; in-flight workers
    ///   are aborted and no partial report is produced.
    /// - [`AppError::Aggregation`] if every worker fails or the synthesis is
    ///   unusable.
    pub async fn run(&self, query: &Query, deadline: Duration) -> Result<Report> {
        let span = tracing::info_span!("research_run", query = %query, workers = self.workers.len());

        async {
            tracing::info!(deadline_secs = deadline.as_secs(), "research run started");
            match tokio::time::timeout(deadline, self.collaborate(query)).await {
                Ok(Ok(report)) => {
                    tracing::info!(
                        contributors = report.contributors.len(),
                        gaps = report.gaps.len(),
                        tables = report.table_count,
                        "research run completed"
                    );
                    Ok(report)
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "research run failed");
                    Err(e)
                }
                Err(_) => {
                    tracing::error!(deadline_secs = deadline.as_secs(), "research run timed out");
                    Err(AppError::Timeout(deadline))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn collaborate(&self, query: &Query) -> Result<Report> {
        if self.workers.is_empty() {
            return Err(AppError::Aggregation(
                "no research workers configured".to_string(),
            ));
        }

        let mut context = SharedContext::new(query.clone(), self.workers.len());
        self.gather(query, &mut context).await?;

        if context.success_count() == 0 {
            let reasons = context
                .gaps()
                .into_iter()
                .map(|(worker, reason)| format!("{}: {}", worker, reason))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Aggregation(format!(
                "all {} research workers failed ({})",
                self.workers.len(),
                reasons
            )));
        }

        self.synthesize(&context).await
    }

    /// Dispatch every worker and record its entry in its own roster slot.
    async fn gather(&self, query: &Query, context: &mut SharedContext) -> Result<()> {
        let limit = self.options.max_concurrency.min(self.workers.len().max(1));
        let permits = Arc::new(Semaphore::new(limit));
        let mut set = JoinSet::new();

        for (index, worker) in self.workers.iter().enumerate() {
            let worker = worker.clone();
            let summarizer = self.summarizer.clone();
            let permits = permits.clone();
            let query = query.clone();
            let budget = self.options.summary_budget;

            set.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let entry = consult(worker.as_ref(), summarizer.as_ref(), &query, budget).await;
                (index, entry)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, entry)) => context.record(index, entry)?,
                Err(e) => tracing::error!(error = %e, "research worker task aborted"),
            }
        }

        // A panicked task leaves its slot empty; record it as a gap.
        for index in context.pending() {
            let spec = self.workers[index].spec();
            context.record(
                index,
                ContextEntry::Gap {
                    worker: spec.name.clone(),
                    capability: spec.capability,
                    reason: "worker task aborted unexpectedly".to_string(),
                },
            )?;
        }

        Ok(())
    }

    async fn synthesize(&self, context: &SharedContext) -> Result<Report> {
        tracing::info!(
            contributors = context.success_count(),
            "synthesizing report"
        );

        let synthesis = self
            .llm
            .generate_with_system(
                &self.policy.system_prompt(),
                &self.policy.synthesis_prompt(context),
            )
            .await
            .map_err(|e| AppError::Aggregation(format!("synthesis failed: {}", e)))?;

        self.policy.finalize(&synthesis, context)
    }
}

/// Run one worker and turn the outcome into its context entry.
///
/// Failures never escape: they become a gap.
async fn consult(
    worker: &dyn Agent,
    summarizer: &dyn Summarizer,
    query: &Query,
    budget: usize,
) -> ContextEntry {
    let spec = worker.spec();
    let finding = match worker.research(query).await {
        Ok(finding) => finding,
        Err(e) => {
            tracing::warn!(worker = %spec.name, error = %e, "worker failed, recording gap");
            return ContextEntry::Gap {
                worker: spec.name.clone(),
                capability: spec.capability,
                reason: e.to_string(),
            };
        }
    };

    let summary = match summarizer.summarize(&finding, budget).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(worker = %spec.name, error = %e, "summarizer failed, using extractive fallback");
            ExtractiveSummarizer.compress(&finding.body, budget)
        }
    };
    // The budget holds whatever the summarizer returned
    let summary = clamp_chars(&summary, budget);

    tracing::debug!(
        worker = %spec.name,
        raw_chars = finding.body.chars().count(),
        summary_chars = summary.chars().count(),
        "finding compressed"
    );

    ContextEntry::Summary {
        worker: spec.name.clone(),
        capability: spec.capability,
        summary,
        links: extract_links(&finding.body),
    }
}

#[async_trait]
impl ResearchTeam for Coordinator {
    async fn run(&self, query: &Query, deadline: Duration) -> Result<Report> {
        Coordinator::run(self, query, deadline).await
    }
}
