//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - Book 聚合与全量组装不变量
//! - 大纲 / 章节桩 / 章节实体
//! - 标题、作者、体裁值对象与回退规则

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Book;
pub use entities::{Chapter, ChapterStub, Outline};
pub use errors::BookError;
pub use value_objects::{Author, BookId, Genre, Title, DEFAULT_AUTHOR, DEFAULT_GENRE};
