use serde::{Deserialize, Serialize};

/// How a simulation was launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchMode {
    /// A single local process
    #[default]
    Serial,

    /// An MPI-style launch across several processes/hosts
    Distributed {
        /// Number of processes
        n: u32,
        /// Path of the MPI launcher
        mpirun: String,
        /// Hosts the processes were spread over
        hosts: Vec<String>,
    },
}

impl LaunchMode {
    /// Stable name stored in the `kind` column
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchMode::Serial => "serial",
            LaunchMode::Distributed { .. } => "distributed",
        }
    }
}
