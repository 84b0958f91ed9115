//! Sled-based Book Store Implementation
//!
//! 持久布局（单棵默认树）:
//! - `library`      -> 整个书库的 JSON 列表（最近优先）
//! - `current_book` -> 当前书籍的 JSON
//! - `last_view`    -> 最后浏览的视图标识（UTF-8 字符串）
//!
//! 损坏恢复契约：任何反序列化失败都记日志并视为无状态
//! （空列表 / None），绝不让启动或读取因此失败。

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{BookStorePort, StoreError};
use crate::domain::book::{Book, BookId};

const KEY_LIBRARY: &str = "library";
const KEY_CURRENT: &str = "current_book";
const KEY_LAST_VIEW: &str = "last_view";

/// Sled 书库配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/library.sled".to_string(),
        }
    }
}

/// Sled 书库
pub struct SledBookStore {
    db: Db,
}

impl SledBookStore {
    /// 创建新的书库实例
    pub fn new(config: &SledStoreConfig) -> Result<Self, StoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!(db_path = %config.db_path, "SledBookStore initialized");
        Ok(Self { db })
    }

    /// 打开指定路径的书库
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let config = SledStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 读取书库列表；损坏时视为空
    fn read_library(&self) -> Result<Vec<Book>, StoreError> {
        let Some(bytes) = self
            .db
            .get(KEY_LIBRARY)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&bytes) {
            Ok(library) => Ok(library),
            Err(e) => {
                tracing::warn!(error = %e, "Library state unparsable, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// 覆写书库列表并落盘
    fn write_library(&self, library: &[Book]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(library)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.db
            .insert(KEY_LIBRARY, bytes)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl BookStorePort for SledBookStore {
    async fn load_library(&self) -> Result<Vec<Book>, StoreError> {
        self.read_library()
    }

    async fn push_front(&self, book: &Book) -> Result<(), StoreError> {
        let mut library = self.read_library()?;
        library.insert(0, book.clone());
        self.write_library(&library)?;
        tracing::debug!(book_id = %book.id, total = library.len(), "Book stored");
        Ok(())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.read_library()?.into_iter().find(|b| b.id == *id))
    }

    async fn remove(&self, id: &BookId) -> Result<bool, StoreError> {
        let mut library = self.read_library()?;
        let before = library.len();
        library.retain(|b| b.id != *id);
        let removed = library.len() != before;
        if removed {
            self.write_library(&library)?;
            tracing::debug!(book_id = %id, "Book removed");
        }
        Ok(removed)
    }

    async fn current_book(&self) -> Result<Option<Book>, StoreError> {
        let Some(bytes) = self
            .db
            .get(KEY_CURRENT)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(None);
        };

        match serde_json::from_slice(&bytes) {
            Ok(book) => Ok(Some(book)),
            Err(e) => {
                tracing::warn!(error = %e, "Current book state unparsable, treating as none");
                Ok(None)
            }
        }
    }

    async fn set_current(&self, book: &Book) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(book)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.db
            .insert(KEY_CURRENT, bytes)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn clear_current(&self) -> Result<(), StoreError> {
        self.db
            .remove(KEY_CURRENT)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    async fn last_view(&self) -> Result<Option<String>, StoreError> {
        let Some(bytes) = self
            .db
            .get(KEY_LAST_VIEW)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?
        else {
            return Ok(None);
        };
        Ok(String::from_utf8(bytes.to_vec()).ok())
    }

    async fn set_last_view(&self, view: &str) -> Result<(), StoreError> {
        self.db
            .insert(KEY_LAST_VIEW, view.as_bytes())
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Author, Outline, Title};
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> SledBookStore {
        SledBookStore::open(dir.path().join("library.sled")).unwrap()
    }

    fn sample_book(title: &str) -> Book {
        Book::assemble(
            &Title::new(title).unwrap(),
            &Author::new("A. Reyes"),
            Outline {
                title: None,
                genre: Some("Mystery".to_string()),
                description: Some("desc".to_string()),
                chapters: Vec::new(),
            },
            Vec::new(),
            "https://covers.invalid/x.png".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_library_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let book = sample_book("Persistent");
        {
            let store = open_store(&dir);
            store.push_front(&book).await.unwrap();
        }

        let store = open_store(&dir);
        let library = store.load_library().await.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0], book);
    }

    #[tokio::test]
    async fn test_push_front_ordering() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        for title in ["first", "second", "third"] {
            store.push_front(&sample_book(title)).await.unwrap();
        }

        let titles: Vec<String> = store
            .load_library()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_remove_book() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let book = sample_book("removable");
        store.push_front(&book).await.unwrap();

        assert!(store.remove(&book.id).await.unwrap());
        assert!(!store.remove(&book.id).await.unwrap());
        assert!(store.load_library().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_library_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.db.insert(KEY_LIBRARY, b"not json at all").unwrap();

        // 损坏状态读取为空，且后续写入恢复正常
        assert!(store.load_library().await.unwrap().is_empty());
        let book = sample_book("fresh start");
        store.push_front(&book).await.unwrap();
        assert_eq!(store.load_library().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_current_treated_as_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.db.insert(KEY_CURRENT, b"{broken").unwrap();
        assert!(store.current_book().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_and_last_view_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let book = sample_book("current");
        store.set_current(&book).await.unwrap();
        assert_eq!(store.current_book().await.unwrap(), Some(book));

        store.clear_current().await.unwrap();
        assert!(store.current_book().await.unwrap().is_none());

        store.set_last_view("library").await.unwrap();
        assert_eq!(store.last_view().await.unwrap().as_deref(), Some("library"));
    }
}
