//! Domain Layer - 领域层
//!
//! 单一限界上下文:
//! - Book Context: 书籍聚合、大纲与章节

pub mod book;

pub use book::{Author, Book, BookId, Chapter, ChapterStub, Genre, Outline, Title};
