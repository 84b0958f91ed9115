//! BookForge - AI 书籍生成系统
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍聚合（大纲、章节、成书）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ContentProvider, BookStore, RunRegistry）
//! - Pipeline: 生成管线状态机（大纲 - 封面 - 章节 - 成书）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Adapters: 内容生成客户端（HTTP 实现与假实现）
//! - Persistence: Sled 书库存储
//! - Memory: 书库与运行注册表内存实现
//! - Export: JSON / HTML 导出
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
