//! Generation Pipeline Driver - 生成管线状态机
//!
//! 一次运行的固定步骤:
//! 1. idle -> outlining: 校验标题非空，清空当前书籍槽位，进度 10
//! 2. outlining -> painting: 大纲就绪，进度 30；立即发出封面请求（不等待）
//! 3. painting -> writing: 不阻塞，立即进入章节顺序循环；
//!    严格按大纲顺序逐章 await，每章完成后进度 = 30 + 已完成/总数 * 50
//! 4. 末章完成后 join 在途的封面任务
//! 5. join 成功: 组装 Book（全量或不产出），插入书库头部并设为当前书，
//!    completed / 100
//! 6. 任意一步失败: 直接进入 failed，不产出也不落库，进度停在最后值
//! 7. 终态后可再次 start，重入即回到第 1 步
//!
//! 运行中再次 start 被拒绝（Busy）。每次运行持有独立的 CancellationToken，
//! 在每次状态变更前检查、并与每个 Provider 调用竞争，
//! 被取代/取消的运行干净终止而不是无人 await 地继续跑。

use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    BookStorePort, ContentProviderPort, CoverRequest, PipelinePhase, ProviderError, RunRecord,
    RunRegistryPort, StoreError,
};
use crate::domain::book::{Author, Book, BookError, Outline, Title};
use crate::infrastructure::events::{EventPublisher, GenerationEvent};

use super::state::{
    progress_after_chapter, PipelineStatus, PROGRESS_COMPLETED, PROGRESS_OUTLINE_DONE,
    PROGRESS_OUTLINING,
};

/// `start` / `cancel` 的调用方错误
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("A generation run is already in progress")]
    Busy,
}

/// 运行内部的失败原因
///
/// 对外不区分失败阶段，统一折叠为 failed 终态 + 消息
#[derive(Debug, Error)]
enum GenerationFailure {
    #[error("generation cancelled")]
    Cancelled,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Assembly(#[from] BookError),

    #[error("cover task aborted: {0}")]
    CoverJoin(String),
}

/// 在途运行句柄
struct ActiveRun {
    run_id: Uuid,
    cancel: CancellationToken,
}

/// 生成管线
///
/// 状态由管线独占修改；表现层通过 watch 通道、运行注册表
/// 和事件流观察，`start` 不返回结果本身
pub struct GenerationPipeline {
    provider: Arc<dyn ContentProviderPort>,
    store: Arc<dyn BookStorePort>,
    runs: Arc<dyn RunRegistryPort>,
    events: Arc<EventPublisher>,
    status_tx: watch::Sender<PipelineStatus>,
    active: Mutex<Option<ActiveRun>>,
}

impl GenerationPipeline {
    pub fn new(
        provider: Arc<dyn ContentProviderPort>,
        store: Arc<dyn BookStorePort>,
        runs: Arc<dyn RunRegistryPort>,
        events: Arc<EventPublisher>,
    ) -> Self {
        let (status_tx, _) = watch::channel(PipelineStatus::idle());
        Self {
            provider,
            store,
            runs,
            events,
            status_tx,
            active: Mutex::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 管线唯一入口：启动一次生成运行
    ///
    /// 标题非空才允许离开 idle；作者留空时回退为默认作者。
    /// 已有运行在途时拒绝（Busy）。结果通过状态/事件观察。
    pub fn start(
        self: &Arc<Self>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Result<Uuid, PipelineError> {
        let title = Title::new(title).map_err(PipelineError::InvalidInput)?;
        let author = Author::new(author);

        let cancel = CancellationToken::new();
        let run_id = {
            let mut active = self.active.lock().unwrap();
            if active.is_some() {
                return Err(PipelineError::Busy);
            }

            let record = RunRecord::new(title.as_str().to_string(), author.as_str().to_string());
            let run_id = record.run_id;
            self.runs.register(record);

            *active = Some(ActiveRun {
                run_id,
                cancel: cancel.clone(),
            });
            run_id
        };

        tracing::info!(
            run_id = %run_id,
            title = %title,
            author = %author,
            "Generation run started"
        );

        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.run(run_id, title, author, cancel).await;
        });

        Ok(run_id)
    }

    /// 取消在途运行，返回是否确有运行被取消
    pub fn cancel(&self) -> bool {
        let active = self.active.lock().unwrap();
        match active.as_ref() {
            Some(run) => {
                tracing::info!(run_id = %run.run_id, "Cancelling generation run");
                run.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// 当前状态快照
    pub fn status(&self) -> PipelineStatus {
        self.status_tx.borrow().clone()
    }

    /// 订阅状态变更
    pub fn subscribe_status(&self) -> watch::Receiver<PipelineStatus> {
        self.status_tx.subscribe()
    }

    /// 驱动一次运行到终态，并释放在途槽位
    async fn run(
        self: Arc<Self>,
        run_id: Uuid,
        title: Title,
        author: Author,
        cancel: CancellationToken,
    ) {
        let outcome = self.run_to_completion(run_id, &title, &author, &cancel).await;

        match outcome {
            Ok(book) => {
                let book_id = book.id;
                if let Err(e) = self.runs.set_completed(run_id, book_id) {
                    tracing::warn!(run_id = %run_id, error = %e, "Run record update failed");
                }
                self.finish(
                    run_id,
                    GenerationEvent::BookCompleted {
                        run_id,
                        book_id,
                        title: book.title.clone(),
                        chapter_count: book.chapter_count(),
                    },
                    |status| {
                        status.phase = PipelinePhase::Completed;
                        status.progress = PROGRESS_COMPLETED;
                        status.book_id = Some(book_id);
                        status.error = None;
                    },
                );
                tracing::info!(
                    run_id = %run_id,
                    book_id = %book_id,
                    chapters = book.chapter_count(),
                    "Generation run completed"
                );
            }
            Err(failure) => {
                // 叫停并发分支，在途封面任务不再白跑到底
                cancel.cancel();

                let message = failure.to_string();
                if let Err(e) = self.runs.set_failed(run_id, message.clone()) {
                    tracing::warn!(run_id = %run_id, error = %e, "Run record update failed");
                }
                // 进度停在最后一次设定的值
                let terminal_error = message.clone();
                self.finish(
                    run_id,
                    GenerationEvent::GenerationFailed {
                        run_id,
                        error: message.clone(),
                    },
                    move |status| {
                        status.phase = PipelinePhase::Failed;
                        status.book_id = None;
                        status.error = Some(terminal_error);
                    },
                );
                tracing::warn!(run_id = %run_id, error = %message, "Generation run failed");
            }
        }
    }

    /// 发布终态并释放在途槽位
    ///
    /// 两者在同一临界区内完成：观察到终态即可立刻重入，
    /// 而后继运行的任何状态更新都排在本终态之后。
    /// 终态快照总是带上本次运行的 run_id，即便运行在首个阶段迁移前就失败。
    fn finish<F>(&self, run_id: Uuid, event: GenerationEvent, update: F)
    where
        F: FnOnce(&mut PipelineStatus),
    {
        let mut active = self.active.lock().unwrap();
        self.status_tx.send_modify(|status| {
            status.run_id = Some(run_id);
            update(status);
        });
        self.events.publish(event);
        if active.as_ref().map(|a| a.run_id) == Some(run_id) {
            *active = None;
        }
    }

    /// 状态机主体：outlining -> painting -> writing -> join -> 组装
    async fn run_to_completion(
        &self,
        run_id: Uuid,
        title: &Title,
        author: &Author,
        cancel: &CancellationToken,
    ) -> Result<Book, GenerationFailure> {
        // 进入 outlining：当前书籍槽位立即清空
        self.checkpoint(cancel)?;
        self.store.clear_current().await?;
        self.transition(run_id, PipelinePhase::Outlining, PROGRESS_OUTLINING);

        let outline = self
            .guarded(cancel, self.provider.generate_outline(title.as_str(), author.as_str()))
            .await?;

        self.checkpoint(cancel)?;
        self.transition(run_id, PipelinePhase::Painting, PROGRESS_OUTLINE_DONE);

        // 封面请求立即发出且不等待，与章节循环并发，组装时才 join。
        // 两个分支写入不相交的数据，无需加锁。
        let cover_task = self.spawn_cover_task(title, author, &outline, cancel);

        // painting 只是在途标记，马上进入顺序写章
        self.transition(run_id, PipelinePhase::Writing, PROGRESS_OUTLINE_DONE);

        let effective_title = outline
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(title.as_str())
            .to_string();

        let total = outline.chapter_count();
        let mut contents: Vec<String> = Vec::with_capacity(total);

        // 严格顺序：第 i 章完成后才开始第 i+1 章，绝不并行
        for stub in &outline.chapters {
            let content = self
                .guarded(cancel, self.provider.generate_chapter_text(&effective_title, stub))
                .await?;
            contents.push(content);

            let progress = progress_after_chapter(contents.len(), total);
            self.checkpoint(cancel)?;
            self.set_progress(run_id, progress);
            self.events.publish(GenerationEvent::ChapterWritten {
                run_id,
                chapter_index: contents.len(),
                total_chapters: total,
                progress,
            });
        }

        // join 在途封面
        let cover_image_url = match cover_task.await {
            Ok(result) => result?,
            Err(e) => return Err(GenerationFailure::CoverJoin(e.to_string())),
        };

        self.checkpoint(cancel)?;
        let book = Book::assemble(title, author, outline, contents, cover_image_url)?;

        self.store.push_front(&book).await?;
        self.store.set_current(&book).await?;
        Ok(book)
    }

    /// 发出封面生成任务（并发分支）
    ///
    /// 请求字段在此处完成大纲回退，封面分支拿到的即最终值
    fn spawn_cover_task(
        &self,
        title: &Title,
        author: &Author,
        outline: &Outline,
        cancel: &CancellationToken,
    ) -> JoinHandle<Result<String, ProviderError>> {
        let request = CoverRequest {
            title: outline
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(title.as_str())
                .to_string(),
            author: author.as_str().to_string(),
            genre: outline
                .genre
                .as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .unwrap_or(crate::domain::book::DEFAULT_GENRE)
                .to_string(),
            description: outline.description.clone().unwrap_or_default(),
        };

        let provider = self.provider.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    Err(ProviderError::ServiceError("cover generation cancelled".to_string()))
                }
                result = provider.generate_cover_image(request) => result,
            }
        })
    }

    /// 将 Provider 调用与取消令牌竞争
    async fn guarded<T, F>(
        &self,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<T, GenerationFailure>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        tokio::select! {
            _ = cancel.cancelled() => Err(GenerationFailure::Cancelled),
            result = call => Ok(result?),
        }
    }

    /// 取消检查，置于每次状态变更之前
    fn checkpoint(&self, cancel: &CancellationToken) -> Result<(), GenerationFailure> {
        if cancel.is_cancelled() {
            return Err(GenerationFailure::Cancelled);
        }
        Ok(())
    }

    /// 阶段迁移：注册表、watch 通道、事件流三处同步更新
    fn transition(&self, run_id: Uuid, phase: PipelinePhase, progress: f32) {
        if let Err(e) = self.runs.set_phase(run_id, phase, progress) {
            tracing::warn!(run_id = %run_id, error = %e, "Run record update failed");
        }
        self.status_tx.send_modify(|status| {
            status.run_id = Some(run_id);
            status.phase = phase;
            status.progress = progress;
            status.book_id = None;
            status.error = None;
        });
        self.events.publish_phase(run_id, phase.as_str(), progress);
        tracing::debug!(run_id = %run_id, phase = phase.as_str(), progress = progress, "Phase transition");
    }

    /// 章节循环内的进度推进（阶段保持 writing）
    fn set_progress(&self, run_id: Uuid, progress: f32) {
        if let Err(e) = self.runs.set_phase(run_id, PipelinePhase::Writing, progress) {
            tracing::warn!(run_id = %run_id, error = %e, "Run record update failed");
        }
        self.status_tx.send_modify(|status| {
            status.progress = progress;
        });
    }
}
