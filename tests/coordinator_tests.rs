//! Coordinator behavior: failure isolation, aggregation errors, deadlines,
//! deterministic ordering and bounded concurrency.

mod common;

use agora::agents::{Agent, build_workers, default_roster};
use agora::research::summarizer::ExtractiveSummarizer;
use agora::research::{Coordinator, CoordinatorOptions};
use agora::tools::CapabilityRegistry;
use agora::types::{AppError, Capability, Query};
use common::mocks::{
    ConcurrencyProbe, MockLLMClient, MockSearch, ScriptedAgent, VALID_SYNTHESIS, VerbatimSummarizer,
};
use std::sync::Arc;
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(600);

fn finding(platform: &str, link: &str) -> String {
    format!(
        "## {platform} findings\n\
         | Title | Link |\n|-------|------|\n| Post | [Post]({link}) |\n\n\
         Sentiment is mixed on {platform}."
    )
}

fn team(agents: Vec<ScriptedAgent>, llm: &MockLLMClient) -> Coordinator {
    let workers: Vec<Arc<dyn Agent>> = agents
        .into_iter()
        .map(|a| Arc::new(a) as Arc<dyn Agent>)
        .collect();
    Coordinator::new(workers, Arc::new(ExtractiveSummarizer), Arc::new(llm.clone()))
}

fn query() -> Query {
    Query::new("Impact of AI on jobs").unwrap()
}

#[tokio::test]
async fn test_single_worker_failure_is_isolated() {
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let coordinator = team(
        vec![
            ScriptedAgent::succeeding(0, &finding("Reddit", "https://reddit.com/r/jobs/1")),
            ScriptedAgent::failing(1),
            ScriptedAgent::succeeding(2, &finding("arXiv", "https://arxiv.org/abs/2401.00001")),
            ScriptedAgent::succeeding(3, &finding("X", "https://x.com/user/status/1")),
        ],
        &llm,
    );

    let report = coordinator.run(&query(), DEADLINE).await.unwrap();

    assert_eq!(
        report.contributors,
        vec![
            "Reddit Researcher",
            "Academic Paper Researcher",
            "Twitter Researcher"
        ]
    );
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].worker, "HackerNews Researcher");
    assert!(report.table_count >= 3);
    for link in [
        "https://reddit.com/r/jobs/1",
        "https://arxiv.org/abs/2401.00001",
        "https://x.com/user/status/1",
    ] {
        assert!(report.text.contains(link), "missing {link}");
        assert!(report.links.iter().any(|l| l == link));
    }

    // The failure note reached the synthesis step
    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.contains("_No findings:"));
}

#[tokio::test]
async fn test_all_workers_failing_is_aggregation_error() {
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let coordinator = team((0..4).map(ScriptedAgent::failing).collect(), &llm);

    let err = coordinator.run(&query(), DEADLINE).await.unwrap_err();

    match err {
        AppError::Aggregation(msg) => assert!(msg.contains("all 4 research workers failed")),
        other => panic!("expected aggregation error, got {other:?}"),
    }
    assert!(llm.calls().is_empty(), "synthesis must not run");
}

#[tokio::test]
async fn test_unusable_synthesis_is_aggregation_error() {
    let agents = || vec![ScriptedAgent::succeeding(0, &finding("Reddit", "https://reddit.com/r/a/1"))];

    let missing_sections = MockLLMClient::new("## Executive Summary\nJust a summary.");
    let err = team(agents(), &missing_sections)
        .run(&query(), DEADLINE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Aggregation(ref m) if m.contains("missing required sections")));

    let empty = MockLLMClient::new("   ");
    let err = team(agents(), &empty).run(&query(), DEADLINE).await.unwrap_err();
    assert!(matches!(err, AppError::Aggregation(_)));

    let failing = MockLLMClient::failing();
    let err = team(agents(), &failing).run(&query(), DEADLINE).await.unwrap_err();
    assert!(matches!(err, AppError::Aggregation(ref m) if m.starts_with("synthesis failed")));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_yields_timeout_promptly() {
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let coordinator = team(
        vec![
            ScriptedAgent::succeeding(0, "fast").with_delay(Duration::from_millis(10)),
            ScriptedAgent::succeeding(1, "slow").with_delay(Duration::from_secs(3600)),
        ],
        &llm,
    );
    let deadline = Duration::from_secs(5);

    let started = tokio::time::Instant::now();
    let err = coordinator.run(&query(), deadline).await.unwrap_err();

    assert!(matches!(err, AppError::Timeout(d) if d == deadline));
    assert!(started.elapsed() < deadline + Duration::from_secs(1));
    assert!(llm.calls().is_empty(), "no partial report may be synthesized");
}

#[tokio::test(start_paused = true)]
async fn test_context_order_ignores_completion_order() {
    let bodies = [
        finding("Reddit", "https://reddit.com/r/a/1"),
        finding("HN", "https://news.ycombinator.com/item?id=1"),
        finding("arXiv", "https://arxiv.org/abs/2401.00001"),
        finding("X", "https://x.com/a/status/1"),
    ];

    let mut prompts = Vec::new();
    for delays in [[1u64, 2, 3, 4], [4, 3, 2, 1]] {
        let llm = MockLLMClient::new(VALID_SYNTHESIS);
        let agents = (0..4)
            .map(|i| {
                ScriptedAgent::succeeding(i, &bodies[i])
                    .with_delay(Duration::from_millis(delays[i] * 100))
            })
            .collect();

        let report = team(agents, &llm).run(&query(), DEADLINE).await.unwrap();
        assert_eq!(
            report.contributors,
            default_roster().iter().map(|s| s.name.clone()).collect::<Vec<_>>()
        );
        prompts.push(llm.calls()[0].1.clone());
    }

    assert_eq!(prompts[0], prompts[1]);
    let reddit = prompts[0].find("Reddit Researcher").unwrap();
    let twitter = prompts[0].find("Twitter Researcher").unwrap();
    assert!(reddit < twitter);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_is_bounded() {
    for (limit, expected_peak) in [(1, 1), (2, 2), (4, 4)] {
        let probe = Arc::new(ConcurrencyProbe::default());
        let llm = MockLLMClient::new(VALID_SYNTHESIS);
        let agents = (0..4)
            .map(|i| {
                ScriptedAgent::succeeding(i, "finding")
                    .with_delay(Duration::from_secs(1))
                    .with_probe(probe.clone())
            })
            .collect();

        team(agents, &llm)
            .with_options(CoordinatorOptions {
                summary_budget: 1200,
                max_concurrency: limit,
            })
            .run(&query(), DEADLINE)
            .await
            .unwrap();

        assert_eq!(probe.peak(), expected_peak, "limit {limit}");
    }
}

#[tokio::test]
async fn test_summaries_are_bounded_before_synthesis() {
    let long_prose = "word ".repeat(2000);
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let coordinator = team(vec![ScriptedAgent::succeeding(0, &long_prose)], &llm).with_options(
        CoordinatorOptions {
            summary_budget: 200,
            max_concurrency: 4,
        },
    );

    coordinator.run(&query(), DEADLINE).await.unwrap();

    let prompt = &llm.calls()[0].1;
    assert!(prompt.len() < long_prose.len() / 4);
}

#[tokio::test]
async fn test_budget_enforced_for_any_summarizer() {
    let raw = "z".repeat(5000);
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let workers: Vec<Arc<dyn Agent>> = vec![Arc::new(ScriptedAgent::succeeding(0, &raw))];
    let coordinator = Coordinator::new(workers, Arc::new(VerbatimSummarizer), Arc::new(llm.clone()))
        .with_options(CoordinatorOptions {
            summary_budget: 100,
            max_concurrency: 4,
        });

    coordinator.run(&query(), DEADLINE).await.unwrap();

    let prompt = &llm.calls()[0].1;
    assert!(prompt.contains(&"z".repeat(99)));
    assert!(!prompt.contains(&"z".repeat(100)));
    assert!(prompt.len() < 1000);
}

#[tokio::test]
async fn test_oversized_concurrency_limit_is_capped() {
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let report = team(
        vec![
            ScriptedAgent::succeeding(0, &finding("Reddit", "https://reddit.com/r/jobs/1")),
            ScriptedAgent::succeeding(1, &finding("HN", "https://news.ycombinator.com/item?id=1")),
        ],
        &llm,
    )
    .with_options(CoordinatorOptions {
        summary_budget: 1200,
        max_concurrency: usize::MAX,
    })
    .run(&query(), DEADLINE)
    .await
    .unwrap();

    assert_eq!(report.contributors.len(), 2);
}

#[tokio::test]
async fn test_no_workers_is_aggregation_error() {
    let llm = MockLLMClient::new(VALID_SYNTHESIS);
    let err = team(vec![], &llm).run(&query(), DEADLINE).await.unwrap_err();
    assert!(matches!(err, AppError::Aggregation(_)));
}

#[tokio::test]
async fn test_default_roster_end_to_end_with_one_source_down() {
    let mut registry = CapabilityRegistry::new();
    let reddit = Arc::new(MockSearch::new(
        "reddit",
        "1. [AI took my job?](https://reddit.com/r/jobs/1) - long thread",
    ));
    registry.register(Capability::CommunityForum, reddit.clone());
    registry.register(
        Capability::TechnicalForum,
        Arc::new(MockSearch::new(
            "hackernews",
            "1. [Ask HN: AI and hiring](https://news.ycombinator.com/item?id=42)",
        )),
    );
    registry.register(
        Capability::ScholarlyIndex,
        Arc::new(MockSearch::new(
            "arxiv",
            "1. [LLMs and Labor](https://arxiv.org/abs/2303.10130)",
        )),
    );
    registry.register(Capability::Microblog, Arc::new(MockSearch::unreachable("x")));

    let llm = Arc::new(MockLLMClient::new(VALID_SYNTHESIS));
    let workers = build_workers(&default_roster(), &registry, llm.clone()).unwrap();
    let coordinator = Coordinator::new(workers, Arc::new(ExtractiveSummarizer), llm.clone());

    let report = coordinator.run(&query(), DEADLINE).await.unwrap();

    assert_eq!(report.contributors.len(), 3);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.gaps[0].worker, "Twitter Researcher");
    assert!(report.gaps[0].reason.contains("source unavailable"));
    assert_eq!(reddit.queries(), vec!["Impact of AI on jobs"]);
    // three workers plus one synthesis
    assert_eq!(llm.calls().len(), 4);
}
