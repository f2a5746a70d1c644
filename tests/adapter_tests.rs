//! Request adapter: one inbound message in, exactly one event out.

mod common;

use agora::executor::{EventKind, EventQueue, InboundMessage, Part, RequestAdapter, RunState};
use agora::types::AppError;
use common::mocks::{MockTeam, TeamOutcome, VALID_SYNTHESIS};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn collect<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

#[tokio::test]
async fn test_zero_text_parts_emits_one_input_error() {
    let team = MockTeam::reporting(VALID_SYNTHESIS);
    let adapter = RequestAdapter::new(team.clone());
    let (queue, mut rx) = EventQueue::new();
    let message = InboundMessage {
        message_id: Some("msg-1".to_string()),
        parts: vec![
            Part::File {
                uri: "file:///tmp/notes.pdf".to_string(),
                name: Some("notes.pdf".to_string()),
            },
            Part::Data {
                data: serde_json::json!({"topic": "ignored"}),
            },
        ],
    };

    let execution = adapter.execute(&message, &queue).await.unwrap();

    let events = collect(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Error);
    assert_eq!(events[0].text, "Error: No message content received.");
    assert_eq!(execution.state, RunState::Failed);
    assert!(team.calls().is_empty());
}

#[tokio::test]
async fn test_empty_parts_list_emits_one_input_error() {
    let team = MockTeam::reporting(VALID_SYNTHESIS);
    let adapter = RequestAdapter::new(team.clone());
    let (queue, mut rx) = EventQueue::new();

    let message = InboundMessage {
        message_id: None,
        parts: vec![],
    };

    adapter.execute(&message, &queue).await.unwrap();

    assert_eq!(collect(&mut rx).len(), 1);
    assert!(team.calls().is_empty());
}

#[tokio::test]
async fn test_text_part_runs_team_once_with_default_deadline() {
    let team = MockTeam::reporting(VALID_SYNTHESIS);
    let adapter = RequestAdapter::new(team.clone());
    let (queue, mut rx) = EventQueue::new();

    let execution = adapter
        .execute(&InboundMessage::text("Impact of AI on jobs"), &queue)
        .await
        .unwrap();

    assert_eq!(
        team.calls(),
        vec![("Impact of AI on jobs".to_string(), Duration::from_secs(600))]
    );
    let events = collect(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::Report);
    assert_eq!(events[0].text, VALID_SYNTHESIS);
    assert_eq!(events[0].task_id, execution.task_id);
    assert_eq!(execution.state, RunState::Done);
}

#[tokio::test]
async fn test_each_failure_emits_exactly_one_error_event() {
    for outcome in [
        TeamOutcome::Timeout,
        TeamOutcome::Fail("all 4 research workers failed".to_string()),
    ] {
        let is_timeout = matches!(outcome, TeamOutcome::Timeout);
        let team = MockTeam::new(outcome);
        let adapter = RequestAdapter::new(team.clone());
        let (queue, mut rx) = EventQueue::new();

        let execution = adapter
            .execute(&InboundMessage::text("Impact of AI on jobs"), &queue)
            .await
            .unwrap();

        let events = collect(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_error());
        assert_eq!(execution.state, RunState::Failed);
        assert_eq!(team.calls().len(), 1);
        if is_timeout {
            assert!(events[0].text.contains("timed out"));
            assert!(events[0].text.contains("simplify your query"));
        } else {
            assert!(events[0].text.contains("all 4 research workers failed"));
            assert!(events[0].text.contains("check logs"));
        }
    }
}

#[tokio::test]
async fn test_configured_deadline_is_passed_to_team() {
    let team = MockTeam::reporting(VALID_SYNTHESIS);
    let adapter = RequestAdapter::new(team.clone()).with_deadline(Duration::from_secs(42));
    let (queue, _rx) = EventQueue::new();

    adapter
        .execute(&InboundMessage::text("q"), &queue)
        .await
        .unwrap();

    assert_eq!(team.calls()[0].1, Duration::from_secs(42));
}

#[tokio::test]
async fn test_cancel_is_rejected_before_and_after_a_run() {
    let adapter = RequestAdapter::new(MockTeam::reporting(VALID_SYNTHESIS));
    let (queue, mut rx) = EventQueue::new();

    assert!(matches!(
        adapter.cancel(uuid::Uuid::new_v4()),
        Err(AppError::Unsupported(_))
    ));

    let execution = adapter
        .execute(&InboundMessage::text("q"), &queue)
        .await
        .unwrap();
    assert!(matches!(
        adapter.cancel(execution.task_id),
        Err(AppError::Unsupported(_))
    ));
    assert_eq!(collect(&mut rx).len(), 1);
}
