//! JSON Export - 书籍元数据导出
//!
//! 将单本 Book 原样序列化为 JSON，纯恒等往返：
//! parse(serialize(book)) == book

use std::path::{Path, PathBuf};

use crate::domain::book::Book;

use super::ExportError;

/// 导出文件名：标题空白折叠为下划线 + .json
pub fn json_filename(book: &Book) -> String {
    format!(
        "{}.json",
        book.title.split_whitespace().collect::<Vec<_>>().join("_")
    )
}

/// 序列化为导出格式（pretty JSON）
pub fn to_json(book: &Book) -> Result<String, ExportError> {
    serde_json::to_string_pretty(book).map_err(|e| ExportError::Serialization(e.to_string()))
}

/// 从导出格式解析
pub fn from_json(json: &str) -> Result<Book, ExportError> {
    serde_json::from_str(json).map_err(|e| ExportError::Serialization(e.to_string()))
}

/// 导出到目录下的文件，返回写入的路径
pub async fn write_json(book: &Book, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(json_filename(book));
    let json = to_json(book)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| ExportError::Io(e.to_string()))?;
    tracing::info!(path = %path.display(), book_id = %book.id, "Book exported as JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Author, ChapterStub, Outline, Title};

    fn sample_book() -> Book {
        Book::assemble(
            &Title::new("The Glass Orchard").unwrap(),
            &Author::new("A. Reyes"),
            Outline {
                title: Some("The Glass Orchard".to_string()),
                genre: Some("Mystery".to_string()),
                description: Some("A quiet town hides a glass orchard.".to_string()),
                chapters: vec![ChapterStub {
                    id: 1,
                    title: "Arrival".to_string(),
                    summary: "She arrives.".to_string(),
                }],
            },
            vec!["The train was late.".to_string()],
            "data:image/png;base64,QUJD".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_is_identity() {
        let book = sample_book();
        let json = to_json(&book).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, book);
    }

    #[test]
    fn test_filename_from_title() {
        let book = sample_book();
        assert_eq!(json_filename(&book), "The_Glass_Orchard.json");
    }

    #[tokio::test]
    async fn test_write_json_to_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let book = sample_book();

        let path = write_json(&book, dir.path()).await.unwrap();
        assert!(path.ends_with("The_Glass_Orchard.json"));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(from_json(&contents).unwrap(), book);
    }
}
