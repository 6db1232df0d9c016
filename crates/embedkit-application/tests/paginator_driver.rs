mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{RecordingSink, channel, settle};
use embedkit_application::{PaginatorRegistry, RenderSink};
use embedkit_application::pager::PaginatorDriver;
use embedkit_core::pager::{
    ActorId, CloseReason, Control, NavigationEvent, Page, PaginatorOptions, PaginatorSession,
    SessionId,
};
use tokio::time::Instant;

fn pages(n: usize) -> Vec<Page> {
    (1..=n).map(|i| Page::Text(format!("page {i}"))).collect()
}

fn session(n: usize, debounce: Duration) -> PaginatorSession {
    PaginatorSession::new_at(
        SessionId::new("view-1"),
        pages(n),
        Some(ActorId::new("alice")),
        PaginatorOptions {
            idle_timeout: Duration::from_secs(180),
            debounce,
        },
        Instant::now().into_std(),
    )
    .unwrap()
}

fn event(actor: &str, control: Control) -> NavigationEvent {
    NavigationEvent::new(SessionId::new("view-1"), ActorId::new(actor), control)
}

fn registry() -> (PaginatorRegistry, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let registry = PaginatorRegistry::new(Arc::clone(&sink) as Arc<dyn RenderSink>);
    (registry, sink)
}

#[tokio::test(start_paused = true)]
async fn navigation_saturates_and_close_detaches_once() {
    let (registry, sink) = registry();
    let opened = registry
        .open(session(3, Duration::ZERO), &channel())
        .await
        .unwrap();

    for _ in 0..3 {
        registry.dispatch(event("alice", Control::Next)).await.unwrap();
    }
    registry.dispatch(event("alice", Control::Prev)).await.unwrap();
    registry.dispatch(event("alice", Control::Close)).await.unwrap();

    let outcome = opened.task.await.unwrap().unwrap();
    assert_eq!(outcome.reason, CloseReason::Explicit);
    assert_eq!(outcome.final_index, 1);

    let labels: Vec<Option<String>> = sink.updates().into_iter().map(|(_, l)| l).collect();
    assert_eq!(
        labels,
        vec![
            Some("Page 2/3".to_string()),
            Some("Page 3/3".to_string()),
            Some("Page 2/3".to_string()),
        ]
    );
    assert_eq!(sink.detach_count(), 1);

    assert!(!registry.is_open(&opened.session_id).await);
    let err = registry
        .dispatch(event("alice", Control::Next))
        .await
        .unwrap_err();
    assert!(err.is_silent());
}

#[tokio::test(start_paused = true)]
async fn foreign_actor_cannot_navigate() {
    let (registry, sink) = registry();
    let opened = registry
        .open(session(3, Duration::ZERO), &channel())
        .await
        .unwrap();

    for control in [Control::Next, Control::Close] {
        let err = registry.dispatch(event("mallory", control)).await.unwrap_err();
        assert!(err.is_authorization());
        assert!(!err.is_silent());
    }
    registry.dispatch(event("alice", Control::Last)).await.unwrap();
    settle(|| sink.updates().len() == 1).await;

    assert!(registry.is_open(&opened.session_id).await);
    assert_eq!(sink.updates()[0].0, Page::Text("page 3".to_string()));
}

#[tokio::test(start_paused = true)]
async fn idle_timeout_closes_without_explicit_close() {
    let (registry, sink) = registry();
    let started = Instant::now();
    let opened = registry
        .open(session(2, Duration::ZERO), &channel())
        .await
        .unwrap();

    let outcome = opened.task.await.unwrap().unwrap();

    assert_eq!(outcome.reason, CloseReason::IdleTimeout);
    assert_eq!(outcome.final_index, 0);
    assert!(started.elapsed() >= Duration::from_secs(180));
    assert_eq!(sink.detach_count(), 1);
    assert!(!registry.is_open(&opened.session_id).await);
}

#[tokio::test(start_paused = true)]
async fn navigation_resets_idle_timer() {
    let (registry, sink) = registry();
    let started = Instant::now();
    let opened = registry
        .open(session(2, Duration::ZERO), &channel())
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(120)).await;
    registry.dispatch(event("alice", Control::Next)).await.unwrap();
    settle(|| sink.updates().len() == 1).await;

    tokio::time::advance(Duration::from_secs(120)).await;
    assert!(registry.is_open(&opened.session_id).await);

    let outcome = opened.task.await.unwrap().unwrap();
    assert_eq!(outcome.reason, CloseReason::IdleTimeout);
    assert!(started.elapsed() >= Duration::from_secs(300));
}

#[tokio::test(start_paused = true)]
async fn rapid_presses_are_debounced() {
    let (registry, sink) = registry();
    let _opened = registry
        .open(session(5, Duration::from_millis(250)), &channel())
        .await
        .unwrap();

    registry.dispatch(event("alice", Control::Next)).await.unwrap();
    registry.dispatch(event("alice", Control::Next)).await.unwrap();
    settle(|| sink.updates().len() == 1).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(sink.updates().len(), 1);

    tokio::time::advance(Duration::from_millis(300)).await;
    registry.dispatch(event("alice", Control::Next)).await.unwrap();
    settle(|| sink.updates().len() == 2).await;
    assert_eq!(sink.updates()[1].1.as_deref(), Some("Page 3/5"));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_sender_closes_the_view() {
    let sink = Arc::new(RecordingSink::default());
    let handle = PaginatorDriver::start(
        session(2, Duration::ZERO),
        Arc::clone(&sink) as Arc<dyn RenderSink>,
        &channel(),
    )
    .await
    .unwrap();

    drop(handle.events);
    let outcome = handle.task.await.unwrap();

    assert_eq!(outcome.reason, CloseReason::Explicit);
    assert_eq!(sink.detach_count(), 1);
}
