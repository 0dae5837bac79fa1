//! SQLite storage adapter.
//!
//! Implements the `pawlog-core` DiaryStore port with sqlx over a WAL-mode
//! database: a single-connection writer pool for serialized writes and a
//! multi-connection reader pool for concurrent reads.

pub mod diary;
pub mod pool;

pub use diary::SqliteDiaryStore;
pub use pool::DatabasePool;
