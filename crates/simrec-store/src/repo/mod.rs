//! Repository layer persisting simulation records to SQLite

pub mod hydration;
pub mod references;
pub mod sqlite_store;

pub use sqlite_store::SqliteRecordStore;
