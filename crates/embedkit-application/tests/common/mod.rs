#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use embedkit_application::{ChannelId, EmbedManager, Invoker, MessageHandle, RenderSink};
use embedkit_core::PermissionLevel;
use embedkit_core::config::EmbedManagerConfig;
use embedkit_core::error::Result;
use embedkit_core::pager::{Control, Page, SessionId};
use embedkit_infrastructure::InMemoryEmbedRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Render {
        handle: MessageHandle,
        page: Page,
        label: Option<String>,
    },
    Update {
        handle: MessageHandle,
        page: Page,
        label: Option<String>,
    },
    Attach {
        handle: MessageHandle,
        session_id: SessionId,
        controls: Vec<Control>,
    },
    Detach {
        handle: MessageHandle,
    },
}

/// Render sink that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl RecordingSink {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(Page, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::Update { page, label, .. } => Some((page, label)),
                _ => None,
            })
            .collect()
    }

    pub fn detach_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SinkCall::Detach { .. }))
            .count()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RenderSink for RecordingSink {
    async fn render_page(
        &self,
        channel: &ChannelId,
        page: &Page,
        label: Option<&str>,
    ) -> Result<MessageHandle> {
        let message_id = format!("msg-{}", self.calls.lock().unwrap().len());
        let handle = MessageHandle::new(channel.clone(), message_id);
        self.record(SinkCall::Render {
            handle: handle.clone(),
            page: page.clone(),
            label: label.map(str::to_string),
        });
        Ok(handle)
    }

    async fn update_page(
        &self,
        handle: &MessageHandle,
        page: &Page,
        label: Option<&str>,
    ) -> Result<()> {
        self.record(SinkCall::Update {
            handle: handle.clone(),
            page: page.clone(),
            label: label.map(str::to_string),
        });
        Ok(())
    }

    async fn attach_controls(
        &self,
        handle: &MessageHandle,
        session_id: &SessionId,
        controls: &[Control],
    ) -> Result<()> {
        self.record(SinkCall::Attach {
            handle: handle.clone(),
            session_id: session_id.clone(),
            controls: controls.to_vec(),
        });
        Ok(())
    }

    async fn detach_controls(&self, handle: &MessageHandle) -> Result<()> {
        self.record(SinkCall::Detach {
            handle: handle.clone(),
        });
        Ok(())
    }
}

pub fn moderator() -> Invoker {
    Invoker::new("alice", PermissionLevel::Moderator)
}

pub fn regular() -> Invoker {
    Invoker::new("bob", PermissionLevel::Regular)
}

pub fn channel() -> ChannelId {
    ChannelId::new("general")
}

/// Config without debounce so tests can fire events back to back.
pub fn test_config() -> EmbedManagerConfig {
    let mut config = EmbedManagerConfig::default();
    config.paginator.debounce_ms = 0;
    config
}

pub fn manager_with(config: EmbedManagerConfig) -> (EmbedManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let manager = EmbedManager::new(
        config,
        Arc::new(InMemoryEmbedRepository::new()),
        Arc::clone(&sink) as Arc<dyn RenderSink>,
    );
    (manager, sink)
}

pub fn manager() -> (EmbedManager, Arc<RecordingSink>) {
    manager_with(test_config())
}

/// Lets spawned driver tasks run until `done` holds.
pub async fn settle(done: impl Fn() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
