use serde::{Deserialize, Serialize};

/// Version-control repository holding the simulation code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// VCS flavour, e.g. "git", "mercurial", "subversion"
    pub kind: String,

    /// Repository URL or local path
    pub url: String,
}

impl Repository {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
        }
    }
}
