//! In-Memory Run Registry Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{PipelinePhase, RunError, RunRecord, RunRegistryPort};
use crate::domain::book::BookId;

/// 内存运行注册表
pub struct InMemoryRunRegistry {
    /// run_id -> RunRecord
    runs: DashMap<Uuid, RunRecord>,
}

impl InMemoryRunRegistry {
    pub fn new() -> Self {
        Self {
            runs: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryRunRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRegistryPort for InMemoryRunRegistry {
    fn register(&self, record: RunRecord) {
        tracing::debug!(run_id = %record.run_id, title = %record.title, "Run registered");
        self.runs.insert(record.run_id, record);
    }

    fn set_phase(&self, run_id: Uuid, phase: PipelinePhase, progress: f32) -> Result<(), RunError> {
        let mut run = self.runs.get_mut(&run_id).ok_or(RunError::NotFound(run_id))?;
        run.phase = phase;
        run.progress = progress;
        Ok(())
    }

    fn set_completed(&self, run_id: Uuid, book_id: BookId) -> Result<(), RunError> {
        let mut run = self.runs.get_mut(&run_id).ok_or(RunError::NotFound(run_id))?;
        run.phase = PipelinePhase::Completed;
        run.progress = 100.0;
        run.book_id = Some(book_id);
        run.completed_at = Some(Utc::now());
        Ok(())
    }

    fn set_failed(&self, run_id: Uuid, error: String) -> Result<(), RunError> {
        let mut run = self.runs.get_mut(&run_id).ok_or(RunError::NotFound(run_id))?;
        run.phase = PipelinePhase::Failed;
        run.error_message = Some(error);
        run.completed_at = Some(Utc::now());
        Ok(())
    }

    fn get(&self, run_id: Uuid) -> Option<RunRecord> {
        self.runs.get(&run_id).map(|r| r.clone())
    }

    fn list(&self) -> Vec<RunRecord> {
        let mut records: Vec<RunRecord> = self.runs.iter().map(|r| r.clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lifecycle() {
        let registry = InMemoryRunRegistry::new();
        let record = RunRecord::new("The Glass Orchard".to_string(), "A. Reyes".to_string());
        let run_id = record.run_id;
        registry.register(record);

        registry
            .set_phase(run_id, PipelinePhase::Outlining, 10.0)
            .unwrap();
        let run = registry.get(run_id).unwrap();
        assert_eq!(run.phase, PipelinePhase::Outlining);
        assert_eq!(run.progress, 10.0);
        assert!(run.completed_at.is_none());

        let book_id = BookId::new();
        registry.set_completed(run_id, book_id).unwrap();
        let run = registry.get(run_id).unwrap();
        assert_eq!(run.phase, PipelinePhase::Completed);
        assert_eq!(run.progress, 100.0);
        assert_eq!(run.book_id, Some(book_id));
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn test_failed_keeps_last_progress() {
        let registry = InMemoryRunRegistry::new();
        let record = RunRecord::new("Doomed".to_string(), "Anonymous".to_string());
        let run_id = record.run_id;
        registry.register(record);

        registry
            .set_phase(run_id, PipelinePhase::Writing, 46.7)
            .unwrap();
        registry
            .set_failed(run_id, "provider exploded".to_string())
            .unwrap();

        let run = registry.get(run_id).unwrap();
        assert_eq!(run.phase, PipelinePhase::Failed);
        assert_eq!(run.progress, 46.7);
        assert_eq!(run.error_message.as_deref(), Some("provider exploded"));
    }

    #[test]
    fn test_unknown_run_is_not_found() {
        let registry = InMemoryRunRegistry::new();
        let result = registry.set_phase(Uuid::new_v4(), PipelinePhase::Writing, 50.0);
        assert!(matches!(result, Err(RunError::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let registry = InMemoryRunRegistry::new();
        for title in ["first", "second"] {
            let mut record = RunRecord::new(title.to_string(), String::new());
            // created_at 单调递增，避免同刻比较
            record.created_at = Utc::now() + chrono::Duration::milliseconds(
                if title == "second" { 10 } else { 0 },
            );
            registry.register(record);
        }
        let titles: Vec<String> = registry.list().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }
}
