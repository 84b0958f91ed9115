//! Event Publisher Implementation
//!
//! 生成事件的 WebSocket 推送实现，单一全局 broadcast 通道

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::book::BookId;

/// 生成过程事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum GenerationEvent {
    /// 管线阶段变更
    PhaseChanged {
        run_id: Uuid,
        phase: String,
        progress: f32,
    },
    /// 单章正文完成
    ChapterWritten {
        run_id: Uuid,
        chapter_index: usize,
        total_chapters: usize,
        progress: f32,
    },
    /// 整书生成完成
    BookCompleted {
        run_id: Uuid,
        book_id: BookId,
        title: String,
        chapter_count: usize,
    },
    /// 生成失败（含取消）
    GenerationFailed {
        run_id: Uuid,
        error: String,
    },
}

/// 事件发布器
///
/// 无订阅者时发布为空操作（broadcast 返回的错误被忽略）
pub struct EventPublisher {
    channel: broadcast::Sender<GenerationEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅生成事件
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.channel.subscribe()
    }

    /// 发布事件
    pub fn publish(&self, event: GenerationEvent) {
        // 没有订阅者时 send 返回 Err，属正常情况
        let _ = self.channel.send(event);
    }

    /// 发布阶段变更事件
    pub fn publish_phase(&self, run_id: Uuid, phase: &'static str, progress: f32) {
        self.publish(GenerationEvent::PhaseChanged {
            run_id,
            phase: phase.to_string(),
            progress,
        });
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.publish_phase(Uuid::new_v4(), "outlining", 10.0);

        let event = rx.recv().await.unwrap();
        match event {
            GenerationEvent::PhaseChanged { phase, progress, .. } => {
                assert_eq!(phase, "outlining");
                assert_eq!(progress, 10.0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let publisher = EventPublisher::new();
        publisher.publish_phase(Uuid::new_v4(), "writing", 55.0);
    }
}
