//! Book Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, BookId, Chapter, Genre, Outline, Title};
use super::errors::BookError;

/// Book 聚合根
///
/// 不变量:
/// - 要么完整组装（所有字段就位，章节与大纲一一对应），要么不存在，
///   绝不向书库或表现层暴露半成品
/// - 章节顺序 = 大纲章节桩顺序
/// - 组装后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub cover_image_url: String,
    pub chapters: Vec<Chapter>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// 从大纲、章节正文和封面组装书籍
    ///
    /// 回退规则:
    /// - outline.title 缺失 -> 用户输入标题
    /// - outline.genre 缺失 -> 默认体裁
    /// - outline.description 缺失 -> 空字符串
    ///
    /// `contents` 必须与大纲章节桩一一对应（同序同数），否则拒绝组装
    pub fn assemble(
        input_title: &Title,
        author: &Author,
        outline: Outline,
        contents: Vec<String>,
        cover_image_url: String,
    ) -> Result<Self, BookError> {
        if contents.len() != outline.chapters.len() {
            return Err(BookError::ChapterMismatch {
                expected: outline.chapters.len(),
                actual: contents.len(),
            });
        }

        let title = outline
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(input_title.as_str())
            .to_string();
        let genre = Genre::new(outline.genre.unwrap_or_default());
        let description = outline.description.unwrap_or_default();

        let chapters: Vec<Chapter> = outline
            .chapters
            .into_iter()
            .zip(contents)
            .map(|(stub, content)| Chapter::from_stub(stub, content))
            .collect();

        Ok(Self {
            id: BookId::new(),
            title,
            author: author.as_str().to_string(),
            genre: genre.as_str().to_string(),
            description,
            cover_image_url,
            chapters,
            created_at: Utc::now(),
        })
    }

    /// 章节数
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::ChapterStub;

    fn outline_with_stubs(n: i64) -> Outline {
        Outline {
            title: Some("The Glass Orchard".to_string()),
            genre: Some("Mystery".to_string()),
            description: Some("A quiet town hides a glass orchard.".to_string()),
            chapters: (1..=n)
                .map(|id| ChapterStub {
                    id,
                    title: format!("Chapter {}", id),
                    summary: format!("Summary {}", id),
                })
                .collect(),
        }
    }

    #[test]
    fn test_assemble_full_book() {
        let title = Title::new("typed title").unwrap();
        let author = Author::new("A. Reyes");
        let contents = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let book = Book::assemble(
            &title,
            &author,
            outline_with_stubs(3),
            contents,
            "data:image/png;base64,xxxx".to_string(),
        )
        .unwrap();

        assert_eq!(book.title, "The Glass Orchard");
        assert_eq!(book.author, "A. Reyes");
        assert_eq!(book.genre, "Mystery");
        assert_eq!(book.chapter_count(), 3);
        // 章节顺序 = 大纲顺序
        let ids: Vec<i64> = book.chapters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(book.chapters[1].content, "two");
    }

    #[test]
    fn test_assemble_falls_back_on_missing_outline_fields() {
        let title = Title::new("Typed Title").unwrap();
        let author = Author::default();
        let outline = Outline {
            title: None,
            genre: None,
            description: None,
            chapters: Vec::new(),
        };

        let book = Book::assemble(&title, &author, outline, Vec::new(), "cover".to_string())
            .unwrap();

        assert_eq!(book.title, "Typed Title");
        assert_eq!(book.genre, super::super::DEFAULT_GENRE);
        assert_eq!(book.description, "");
        assert!(book.chapters.is_empty());
    }

    #[test]
    fn test_assemble_rejects_chapter_mismatch() {
        let title = Title::new("t").unwrap();
        let author = Author::default();
        let result = Book::assemble(
            &title,
            &author,
            outline_with_stubs(2),
            vec!["only one".to_string()],
            "cover".to_string(),
        );
        assert_eq!(
            result.unwrap_err(),
            BookError::ChapterMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_book_json_round_trip() {
        let title = Title::new("Round Trip").unwrap();
        let author = Author::new("A. Reyes");
        let book = Book::assemble(
            &title,
            &author,
            outline_with_stubs(1),
            vec!["content".to_string()],
            "https://example.com/cover.png".to_string(),
        )
        .unwrap();

        let json = serde_json::to_string_pretty(&book).unwrap();
        let parsed: Book = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, book);
    }
}
