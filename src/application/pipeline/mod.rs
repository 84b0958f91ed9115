//! Generation Pipeline - 生成管线
//!
//! 核心状态机：把用户输入的标题/作者经由大纲、封面（并发分支）、
//! 逐章正文三类 Provider 调用编排为一本完整的 Book

mod driver;
mod state;

pub use driver::{GenerationPipeline, PipelineError};
pub use state::{
    progress_after_chapter, PipelineStatus, PROGRESS_COMPLETED, PROGRESS_OUTLINE_DONE,
    PROGRESS_OUTLINING, PROGRESS_WRITING_SPAN,
};
