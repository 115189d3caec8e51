use serde::{Deserialize, Serialize};

/// A library or module the simulation code imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub path: String,
    pub version: String,

    /// Language/module system the dependency was found through
    pub module: Option<String>,

    /// Uncommitted changes in the dependency's working copy
    pub diff: String,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            version: version.into(),
            module: None,
            diff: String::new(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }
}
