//! Content Provider Port - 生成式内容服务抽象
//!
//! 定义大纲 / 章节正文 / 封面三类生成调用的抽象接口，
//! 具体实现在 infrastructure/adapters 层。
//!
//! 三个操作相互独立、无共享状态；封面生成可与章节生成并发。
//! Provider 对返回内容不做任何正确性承诺（长度、切题与否），
//! 失败也不重试，由管线统一进入终态。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{ChapterStub, Outline};

/// Provider 错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 封面生成请求
///
/// 字段已做过大纲回退，Provider 拿到的都是最终值
#[derive(Debug, Clone)]
pub struct CoverRequest {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
}

/// Content Provider Port
///
/// 外部生成式内容服务的抽象接口
#[async_trait]
pub trait ContentProviderPort: Send + Sync {
    /// 生成书籍大纲
    ///
    /// 远程调用失败或返回内容无法解析为大纲结构时失败。
    /// 可选字段缺失不算失败，由组装阶段回退。
    async fn generate_outline(&self, title: &str, author: &str)
        -> Result<Outline, ProviderError>;

    /// 为单个章节桩生成正文
    ///
    /// 对每个桩可独立、重复调用，调用间无共享可变状态
    async fn generate_chapter_text(
        &self,
        book_title: &str,
        stub: &ChapterStub,
    ) -> Result<String, ProviderError>;

    /// 生成封面图片，返回图片引用（data URL 或远程 URL）
    ///
    /// 与章节生成相互独立，可并发执行
    async fn generate_cover_image(&self, request: CoverRequest) -> Result<String, ProviderError>;

    /// 检查 Provider 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
