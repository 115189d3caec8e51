use serde::{Deserialize, Serialize};

/// The program that ran a simulation (interpreter, simulator binary, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executable {
    /// Human-readable program name, e.g. "Python" or "NEURON"
    pub name: String,

    /// Filesystem path of the executable
    pub path: String,

    /// Version string reported by the executable, if it could be determined
    pub version: Option<String>,

    /// Command-line options passed to the executable
    pub options: Option<String>,
}

impl Executable {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version: None,
            options: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}
