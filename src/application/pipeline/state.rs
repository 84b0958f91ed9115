//! Pipeline State - 管线状态与进度
//!
//! 进度刻度（固定线性序列）:
//! - 进入 outlining: 10
//! - 大纲完成 / 进入 painting: 30
//! - 每章完成: 30 + 已完成数/总章数 * 50（30 -> 80 匀速上升）
//! - 组装完成: 100
//!
//! 失败时进度停留在最后一次设定的值，不回退。

use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::PipelinePhase;
use crate::domain::book::BookId;

/// 进入 outlining 时的进度
pub const PROGRESS_OUTLINING: f32 = 10.0;
/// 大纲完成后的进度（章节循环的基线）
pub const PROGRESS_OUTLINE_DONE: f32 = 30.0;
/// 章节循环占用的进度区间宽度
pub const PROGRESS_WRITING_SPAN: f32 = 50.0;
/// 终态进度
pub const PROGRESS_COMPLETED: f32 = 100.0;

/// 第 `done` 章完成后的进度（`total` 为总章数）
///
/// total == 0 时章节循环零次迭代，进度停在基线 30
pub fn progress_after_chapter(done: usize, total: usize) -> f32 {
    if total == 0 {
        return PROGRESS_OUTLINE_DONE;
    }
    PROGRESS_OUTLINE_DONE + (done as f32 / total as f32) * PROGRESS_WRITING_SPAN
}

/// 管线对外可观察的状态快照
///
/// 由管线独占修改，表现层通过 watch 通道或查询接口观察
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    /// 当前（或最近一次）运行
    pub run_id: Option<Uuid>,
    pub phase: PipelinePhase,
    pub progress: f32,
    /// 成功完成后指向产出的书
    pub book_id: Option<BookId>,
    /// 失败原因（仅终态 failed 时存在）
    pub error: Option<String>,
}

impl PipelineStatus {
    pub fn idle() -> Self {
        Self {
            run_id: None,
            phase: PipelinePhase::Idle,
            progress: 0.0,
            book_id: None,
            error: None,
        }
    }
}

impl Default for PipelineStatus {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_rises_evenly_across_chapters() {
        // 3 章: 30 + k * (50/3)
        let expected = [
            30.0 + 50.0 / 3.0,
            30.0 + 2.0 * 50.0 / 3.0,
            80.0,
        ];
        for (k, want) in expected.iter().enumerate() {
            let got = progress_after_chapter(k + 1, 3);
            assert!((got - want).abs() < 1e-4, "k={}: {} != {}", k + 1, got, want);
        }
    }

    #[test]
    fn test_progress_strictly_increasing() {
        let total = 7;
        let mut last = PROGRESS_OUTLINE_DONE;
        for done in 1..=total {
            let p = progress_after_chapter(done, total);
            assert!(p > last);
            last = p;
        }
        assert!((last - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_progress_empty_outline_stays_at_baseline() {
        assert_eq!(progress_after_chapter(0, 0), PROGRESS_OUTLINE_DONE);
    }

    #[test]
    fn test_phase_terminality() {
        use crate::application::ports::PipelinePhase::*;
        assert!(Completed.is_terminal());
        assert!(Failed.is_terminal());
        for phase in [Idle, Outlining, Painting, Writing] {
            assert!(!phase.is_terminal());
        }
        for phase in [Outlining, Painting, Writing] {
            assert!(phase.is_active());
        }
        assert!(!Idle.is_active());
    }
}
