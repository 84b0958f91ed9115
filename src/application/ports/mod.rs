//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod book_store;
mod content_provider;
mod run_registry;

pub use book_store::{BookStorePort, StoreError};
pub use content_provider::{ContentProviderPort, CoverRequest, ProviderError};
pub use run_registry::{PipelinePhase, RunError, RunRecord, RunRegistryPort};
