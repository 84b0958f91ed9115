//! Export - 导出面
//!
//! - JSON: 单本书原样序列化（恒等往返）
//! - HTML: 可打印书稿（PDF 化委托给外部）

pub mod html;
pub mod json;

use thiserror::Error;

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}
