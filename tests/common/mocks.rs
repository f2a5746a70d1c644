//! Mock implementations for testing.
//!
//! This module provides mock LLM clients, search capabilities, scripted
//! research agents and a counting research team that can be used across
//! different test files without duplication.

use agora::agents::{Agent, WorkerSpec, default_roster};
use agora::llm::LLMClient;
use agora::research::summarizer::Summarizer;
use agora::research::{Report, ResearchTeam};
use agora::tools::SearchCapability;
use agora::types::{AppError, Finding, Query, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A synthesis that satisfies the report policy on its own: all six
/// sections in order and three tables.
pub const VALID_SYNTHESIS: &str = "\
## 1. Executive Summary
Opinion is split between productivity gains and displacement fears.

## 2. Detailed Findings by Platform
| Platform | Sentiment |
|----------|-----------|
| Reddit | mixed |

## 3. Cross-Platform Analysis
| Theme | Reddit | HN |
|-------|--------|----|
| Automation | worried | curious |

## 4. Impact Assessment
| Impact | Positive | Negative |
|--------|----------|----------|
| Jobs | new roles | fewer entry roles |

## 5. Recommendations
- Invest in reskilling.

## 6. Conclusion
Cautious optimism.";

/// Mock LLM client for testing with configurable responses.
///
/// Every call is recorded as `(system, prompt)` so tests can inspect what
/// the coordinator sent.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .push((system.to_string(), prompt.to_string()));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock search capability returning fixed text or failing.
pub struct MockSearch {
    name: String,
    result: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new(name: &str, result: &str) -> Self {
        Self {
            name: name.to_string(),
            result: Some(result.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            result: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SearchCapability for MockSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<String> {
        self.queries.lock().push(query.to_string());
        self.result
            .clone()
            .ok_or_else(|| AppError::Tool(format!("{} is unreachable", self.name)))
    }
}

/// Tracks how many scripted agents are researching at once.
#[derive(Default)]
pub struct ConcurrencyProbe {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Research agent with a scripted outcome and optional delay.
pub struct ScriptedAgent {
    spec: WorkerSpec,
    body: Option<String>,
    delay: Duration,
    probe: Option<Arc<ConcurrencyProbe>>,
    calls: AtomicUsize,
}

impl ScriptedAgent {
    /// An agent for roster slot `index` that returns `body`
    pub fn succeeding(index: usize, body: &str) -> Self {
        Self {
            spec: default_roster()[index].clone(),
            body: Some(body.to_string()),
            delay: Duration::ZERO,
            probe: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// An agent for roster slot `index` whose source is down
    pub fn failing(index: usize) -> Self {
        Self {
            body: None,
            ..Self::succeeding(index, "")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_probe(mut self, probe: Arc<ConcurrencyProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn research(&self, _query: &Query) -> Result<Finding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(probe) = &self.probe {
            probe.enter();
        }
        tokio::time::sleep(self.delay).await;
        if let Some(probe) = &self.probe {
            probe.exit();
        }

        match &self.body {
            Some(body) => Ok(Finding::new(self.spec.name.clone(), body.clone())),
            None => Err(AppError::Worker {
                worker: self.spec.name.clone(),
                reason: "source unavailable".to_string(),
            }),
        }
    }

    fn spec(&self) -> &WorkerSpec {
        &self.spec
    }
}

/// What a [`MockTeam`] does when run
pub enum TeamOutcome {
    Report(String),
    Timeout,
    Fail(String),
}

/// Research team that records every call.
pub struct MockTeam {
    outcome: TeamOutcome,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl MockTeam {
    pub fn new(outcome: TeamOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn reporting(text: &str) -> Arc<Self> {
        Self::new(TeamOutcome::Report(text.to_string()))
    }

    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ResearchTeam for MockTeam {
    async fn run(&self, query: &Query, deadline: Duration) -> Result<Report> {
        self.calls.lock().push((query.to_string(), deadline));
        match &self.outcome {
            TeamOutcome::Report(text) => Ok(Report {
                query: query.clone(),
                text: text.clone(),
                contributors: vec!["Reddit Researcher".to_string()],
                gaps: vec![],
                links: vec![],
                table_count: 3,
                generated_at: chrono::Utc::now(),
            }),
            TeamOutcome::Timeout => Err(AppError::Timeout(deadline)),
            TeamOutcome::Fail(reason) => Err(AppError::Aggregation(reason.clone())),
        }
    }
}

/// Summarizer that ignores the budget and returns the raw finding body
pub struct VerbatimSummarizer;

#[async_trait]
impl Summarizer for VerbatimSummarizer {
    async fn summarize(&self, finding: &Finding, _budget: usize) -> Result<String> {
        Ok(finding.body.clone())
    }
}
