use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simulation input parameters
///
/// `format` names the syntax the parameters were read from ("simple",
/// "config", "json", ...); `values` holds the parsed name/value pairs.
/// Keys are kept sorted so equal parameter sets serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParameterSet {
    pub format: String,
    pub values: BTreeMap<String, serde_json::Value>,
}

impl ParameterSet {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
