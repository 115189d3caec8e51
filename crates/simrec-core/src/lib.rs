//! simrec core - domain model and shared facilities for simulation records
//!
//! This crate provides:
//! - The simulation record model and the reference entities it points at
//!   (executable, repository, launch mode, datastore, parameters,
//!   dependencies, platform information)
//! - Content identity used to deduplicate reference entities
//! - The `RecordStore` interface implemented by storage backends
//! - Structured error and logging facilities

pub mod errors;
pub mod identity;
pub mod logging_facility;
pub mod model;
pub mod record_store;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, RecordError, Result};
pub use identity::{ContentIdentity, ReferenceKind};
pub use model::SimRecord;
pub use record_store::RecordStore;
