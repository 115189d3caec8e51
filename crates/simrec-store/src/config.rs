//! Store configuration
//!
//! A record store is fully identified by the path of its database file, so
//! the configuration is that path and nothing else. Serializing a store
//! yields this value; deserializing it reopens the same database.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the database file location
pub const DB_FILE_ENV: &str = "SIMREC_DB_FILE";

/// Database file used when nothing else is configured
pub const DEFAULT_DB_FILE: &str = ".smt/smt.db";

/// Path used for private in-memory databases
pub const IN_MEMORY: &str = ":memory:";

/// Location of a record store database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreConfig {
    db_file: PathBuf,
}

impl StoreConfig {
    pub fn new(db_file: impl Into<PathBuf>) -> Self {
        Self {
            db_file: db_file.into(),
        }
    }

    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    /// Read `SIMREC_DB_FILE`, falling back to the default location
    pub fn from_env() -> Self {
        match std::env::var_os(DB_FILE_ENV) {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    pub fn db_file(&self) -> &Path {
        &self.db_file
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_file.as_os_str() == IN_MEMORY
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_FILE)
    }
}

impl std::fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.db_file.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_location() {
        assert_eq!(
            StoreConfig::default().db_file(),
            Path::new(".smt/smt.db")
        );
    }

    #[test]
    fn test_serializes_as_bare_path() {
        let config = StoreConfig::new("/data/smt/records.db");
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, "\"/data/smt/records.db\"");

        let back: StoreConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_in_memory_flag() {
        assert!(StoreConfig::in_memory().is_in_memory());
        assert!(!StoreConfig::default().is_in_memory());
    }
}
