use serde::{Deserialize, Serialize};

/// Where a simulation's output data lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Datastore {
    /// Plain files under a root directory
    FileSystem { root: String },
}

impl Datastore {
    /// Stable name stored in the `kind` column
    pub fn kind(&self) -> &'static str {
        match self {
            Datastore::FileSystem { .. } => "file_system",
        }
    }

    /// Root location of the stored data
    pub fn root(&self) -> &str {
        match self {
            Datastore::FileSystem { root } => root,
        }
    }
}
