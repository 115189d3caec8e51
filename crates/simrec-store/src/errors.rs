//! Error handling for simrec-store
//!
//! Wraps simrec-core ExError with store-specific helpers. Backend errors are
//! attached unchanged as the error's cause.

use simrec_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, err))
        .with_cause(err)
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error, keeping the original as cause
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
        .with_cause(err)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
        .with_cause(err)
}

/// A row that should exist right after it was written could not be read back
pub fn missing_row(table: &str, key: &str) -> ExError {
    ExError::new(ExErrorKind::Internal)
        .with_op("resolve_reference")
        .with_message(format!("Row with key {} vanished from {}", key, table))
}
