//! Application State

use std::sync::Arc;

use crate::application::pipeline::GenerationPipeline;
use crate::application::ports::{BookStorePort, ContentProviderPort, RunRegistryPort};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
///
/// 管线与各端口的共享句柄，注入所有 HTTP handler
pub struct AppState {
    pub pipeline: Arc<GenerationPipeline>,
    pub store: Arc<dyn BookStorePort>,
    pub runs: Arc<dyn RunRegistryPort>,
    pub provider: Arc<dyn ContentProviderPort>,
    pub events: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        pipeline: Arc<GenerationPipeline>,
        store: Arc<dyn BookStorePort>,
        runs: Arc<dyn RunRegistryPort>,
        provider: Arc<dyn ContentProviderPort>,
        events: Arc<EventPublisher>,
    ) -> Self {
        Self {
            pipeline,
            store,
            runs,
            provider,
            events,
        }
    }
}
