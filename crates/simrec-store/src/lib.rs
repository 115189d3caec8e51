//! SimRec Store - relational persistence for simulation records
//!
//! Provides:
//! - SQLite schema with a checksummed migrations framework
//! - Get-or-create storage of shared reference entities
//! - `SqliteRecordStore`, the `RecordStore` implementation

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::StoreConfig;
pub use errors::Result;
pub use repo::SqliteRecordStore;
