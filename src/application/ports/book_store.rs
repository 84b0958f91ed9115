//! Book Store Port - 书库持久化抽象
//!
//! 书库是一份最近优先的有序书籍列表，外加两个单值槽位：
//! 当前书籍（current）与最后浏览的视图标识（last view）。
//! 显式注入管线与表现层，不做环境全局状态。
//!
//! 损坏恢复契约：无法反序列化的持久状态视为不存在（空列表 / None），
//! 绝不因此报错。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{Book, BookId};

/// 书库错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Book Store Port
#[async_trait]
pub trait BookStorePort: Send + Sync {
    /// 加载整个书库，最近完成的在最前
    async fn load_library(&self) -> Result<Vec<Book>, StoreError>;

    /// 将新书插入列表头部（最近优先）
    async fn push_front(&self, book: &Book) -> Result<(), StoreError>;

    /// 按 ID 查找
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError>;

    /// 按 ID 删除，返回是否确有删除
    async fn remove(&self, id: &BookId) -> Result<bool, StoreError>;

    /// 当前书籍槽位
    async fn current_book(&self) -> Result<Option<Book>, StoreError>;

    /// 设置当前书籍
    async fn set_current(&self, book: &Book) -> Result<(), StoreError>;

    /// 清空当前书籍（新一轮生成开始时调用）
    async fn clear_current(&self) -> Result<(), StoreError>;

    /// 最后浏览的视图标识
    async fn last_view(&self) -> Result<Option<String>, StoreError>;

    /// 记录最后浏览的视图标识
    async fn set_last_view(&self, view: &str) -> Result<(), StoreError>;
}
