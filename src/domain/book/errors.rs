//! Book Context - Domain Errors

use thiserror::Error;

/// Book 领域错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookError {
    /// 章节数与大纲不一致，违反全量组装不变量
    #[error("Chapter count mismatch: outline has {expected}, got {actual}")]
    ChapterMismatch { expected: usize, actual: usize },
}
