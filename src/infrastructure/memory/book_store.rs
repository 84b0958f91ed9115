//! In-Memory Book Store Implementation
//!
//! 非持久化书库，用于测试与 --no-persist 运行模式

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{BookStorePort, StoreError};
use crate::domain::book::{Book, BookId};

#[derive(Default)]
struct Inner {
    /// 最近优先的书籍列表
    library: Vec<Book>,
    current: Option<Book>,
    last_view: Option<String>,
}

/// 内存书库
pub struct InMemoryBookStore {
    inner: Mutex<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStorePort for InMemoryBookStore {
    async fn load_library(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.inner.lock().await.library.clone())
    }

    async fn push_front(&self, book: &Book) -> Result<(), StoreError> {
        self.inner.lock().await.library.insert(0, book.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, StoreError> {
        Ok(self
            .inner
            .lock()
            .await
            .library
            .iter()
            .find(|b| b.id == *id)
            .cloned())
    }

    async fn remove(&self, id: &BookId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.library.len();
        inner.library.retain(|b| b.id != *id);
        Ok(inner.library.len() != before)
    }

    async fn current_book(&self) -> Result<Option<Book>, StoreError> {
        Ok(self.inner.lock().await.current.clone())
    }

    async fn set_current(&self, book: &Book) -> Result<(), StoreError> {
        self.inner.lock().await.current = Some(book.clone());
        Ok(())
    }

    async fn clear_current(&self) -> Result<(), StoreError> {
        self.inner.lock().await.current = None;
        Ok(())
    }

    async fn last_view(&self) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().await.last_view.clone())
    }

    async fn set_last_view(&self, view: &str) -> Result<(), StoreError> {
        self.inner.lock().await.last_view = Some(view.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Author, Outline, Title};

    fn sample_book(title: &str) -> Book {
        Book::assemble(
            &Title::new(title).unwrap(),
            &Author::default(),
            Outline {
                title: None,
                genre: None,
                description: None,
                chapters: Vec::new(),
            },
            Vec::new(),
            "cover".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_push_front_orders_most_recent_first() {
        let store = InMemoryBookStore::new();
        let first = sample_book("first");
        let second = sample_book("second");
        store.push_front(&first).await.unwrap();
        store.push_front(&second).await.unwrap();

        let library = store.load_library().await.unwrap();
        assert_eq!(library[0].title, "second");
        assert_eq!(library[1].title, "first");
    }

    #[tokio::test]
    async fn test_remove_and_find() {
        let store = InMemoryBookStore::new();
        let book = sample_book("gone soon");
        store.push_front(&book).await.unwrap();

        assert!(store.find_by_id(&book.id).await.unwrap().is_some());
        assert!(store.remove(&book.id).await.unwrap());
        assert!(!store.remove(&book.id).await.unwrap());
        assert!(store.find_by_id(&book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_slot() {
        let store = InMemoryBookStore::new();
        assert!(store.current_book().await.unwrap().is_none());

        let book = sample_book("current");
        store.set_current(&book).await.unwrap();
        assert_eq!(
            store.current_book().await.unwrap().map(|b| b.id),
            Some(book.id)
        );

        store.clear_current().await.unwrap();
        assert!(store.current_book().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_view() {
        let store = InMemoryBookStore::new();
        assert!(store.last_view().await.unwrap().is_none());
        store.set_last_view("history").await.unwrap();
        assert_eq!(store.last_view().await.unwrap().as_deref(), Some("history"));
    }
}
