//! The session record: its in-memory form and where it is persisted.

pub mod file;
pub mod history;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use file::FileSessionStore;
pub use history::{SessionLog, SessionRecordError, SkippedEntry};
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;
pub use store::{SessionLocation, SessionStore, StoreError};
