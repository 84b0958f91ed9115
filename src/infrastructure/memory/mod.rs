//! In-Memory Implementations - 内存实现
//!
//! RunRegistry 的内存实现，以及测试/非持久化模式用的内存书库

mod book_store;
mod run_registry;

pub use book_store::InMemoryBookStore;
pub use run_registry::InMemoryRunRegistry;
