//! Application Layer - 应用层
//!
//! - Ports: 出站端口（ContentProvider, BookStore, RunRegistry）
//! - Pipeline: 生成管线状态机（核心编排逻辑）

pub mod pipeline;
pub mod ports;

pub use pipeline::{GenerationPipeline, PipelineError, PipelineStatus};
pub use ports::{
    BookStorePort, ContentProviderPort, CoverRequest, PipelinePhase, ProviderError, RunError,
    RunRecord, RunRegistryPort, StoreError,
};
