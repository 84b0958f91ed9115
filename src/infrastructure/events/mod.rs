//! Events - 生成事件发布

mod publisher;

pub use publisher::{EventPublisher, GenerationEvent};
