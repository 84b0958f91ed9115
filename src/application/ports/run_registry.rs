//! Run Registry Port - 生成运行记录
//!
//! 记录每次生成运行的阶段与结果，所有状态存内存，
//! 具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::book::BookId;

/// Run Registry 错误
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Run not found: {0}")]
    NotFound(Uuid),
}

/// 管线阶段
///
/// 初始态 idle，终态 completed / failed。
/// painting 表示封面请求已在途（不阻塞），writing 表示章节顺序生成中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    /// 未开始
    Idle,
    /// 大纲生成中
    Outlining,
    /// 封面请求已发出（在途，不等待）
    Painting,
    /// 章节顺序生成中
    Writing,
    /// 生成完成
    Completed,
    /// 生成失败（含取消）
    Failed,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::Outlining => "outlining",
            PipelinePhase::Painting => "painting",
            PipelinePhase::Writing => "writing",
            PipelinePhase::Completed => "completed",
            PipelinePhase::Failed => "failed",
        }
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelinePhase::Completed | PipelinePhase::Failed)
    }

    /// 是否有运行在途（非 idle 且非终态）
    pub fn is_active(&self) -> bool {
        !matches!(self, PipelinePhase::Idle) && !self.is_terminal()
    }
}

/// 一次生成运行的记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub title: String,
    pub author: String,
    pub phase: PipelinePhase,
    /// 进度 [0, 100]，失败时保留最后一次的值
    pub progress: f32,
    /// 成功完成后指向产出的书
    pub book_id: Option<BookId>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn new(title: String, author: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            title,
            author,
            phase: PipelinePhase::Idle,
            progress: 0.0,
            book_id: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Run Registry Port
///
/// 管理生成运行的生命周期记录
pub trait RunRegistryPort: Send + Sync {
    /// 登记新运行
    fn register(&self, record: RunRecord);

    /// 更新阶段与进度
    fn set_phase(&self, run_id: Uuid, phase: PipelinePhase, progress: f32) -> Result<(), RunError>;

    /// 标记成功完成
    fn set_completed(&self, run_id: Uuid, book_id: BookId) -> Result<(), RunError>;

    /// 标记失败并记录原因
    fn set_failed(&self, run_id: Uuid, error: String) -> Result<(), RunError>;

    /// 获取单条运行记录
    fn get(&self, run_id: Uuid) -> Option<RunRecord>;

    /// 列出所有运行记录，最新在前
    fn list(&self) -> Vec<RunRecord>;
}
