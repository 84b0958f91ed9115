//! Sled Persistence - 书库持久化

mod book_store;

pub use book_store::{SledBookStore, SledStoreConfig};
