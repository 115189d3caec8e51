use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{
    Datastore, Dependency, Executable, LaunchMode, ParameterSet, PlatformInformation, Repository,
};
use crate::errors::{RecordError, Result};

/// Separator used for the persisted tag column
pub const TAG_SEPARATOR: char = ',';

/// SimRecord - provenance entry for one simulation run
///
/// Describes what was run (executable, code version, parameters), where its
/// output went (datastore, data key), on which machines, and how it turned
/// out. A record is addressed by its `label` and always belongs to exactly
/// one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimRecord {
    /// Unique handle used for lookup and deletion
    pub label: String,

    /// Label of the group (project) this record belongs to
    pub group: String,

    /// When the simulation was launched
    pub timestamp: DateTime<Utc>,

    /// Why the simulation was run
    pub reason: Option<String>,

    /// Wall-clock run time in seconds
    pub duration: Option<f64>,

    /// Free-text assessment of the result
    pub outcome: Option<String>,

    /// Entry-point file of the simulation code
    pub main_file: Option<String>,

    /// Revision of the simulation code
    pub version: Option<String>,

    /// Reference to the output data in the datastore
    pub data_key: String,

    pub executable: Executable,
    pub repository: Repository,
    pub launch_mode: LaunchMode,
    pub datastore: Datastore,
    pub parameters: ParameterSet,

    pub tags: BTreeSet<String>,

    /// Libraries used by the simulation code, in discovery order
    pub dependencies: Vec<Dependency>,

    /// One entry per machine involved in the run
    pub platforms: Vec<PlatformInformation>,

    /// Uncommitted changes in the working copy at launch time
    pub diff: String,
}

impl SimRecord {
    /// Create a record with the required references and empty optional fields
    ///
    /// This is also the entry point used when rebuilding records from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: impl Into<String>,
        group: impl Into<String>,
        timestamp: DateTime<Utc>,
        executable: Executable,
        repository: Repository,
        launch_mode: LaunchMode,
        datastore: Datastore,
        parameters: ParameterSet,
    ) -> Self {
        Self {
            label: label.into(),
            group: group.into(),
            timestamp,
            reason: None,
            duration: None,
            outcome: None,
            main_file: None,
            version: None,
            data_key: String::new(),
            executable,
            repository,
            launch_mode,
            datastore,
            parameters,
            tags: BTreeSet::new(),
            dependencies: Vec::new(),
            platforms: Vec::new(),
            diff: String::new(),
        }
    }

    /// Add a tag, returning the record for chaining
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Tags as they are persisted: sorted and comma-joined
    pub fn joined_tags(&self) -> String {
        join_tags(&self.tags)
    }

    /// Check the invariants the persisted representation relies on
    ///
    /// # Errors
    ///
    /// - `EmptyLabel` if the label is empty
    /// - `EmptyGroup` if the group label is empty
    /// - `InvalidTag` if a tag is empty or contains the tag separator
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(RecordError::EmptyLabel);
        }
        if self.group.trim().is_empty() {
            return Err(RecordError::EmptyGroup {
                label: self.label.clone(),
            });
        }
        for tag in &self.tags {
            if tag.is_empty() {
                return Err(RecordError::InvalidTag {
                    label: self.label.clone(),
                    tag: tag.clone(),
                    reason: "tag cannot be empty".to_string(),
                });
            }
            if tag.contains(TAG_SEPARATOR) {
                return Err(RecordError::InvalidTag {
                    label: self.label.clone(),
                    tag: tag.clone(),
                    reason: format!("tag cannot contain '{}'", TAG_SEPARATOR),
                });
            }
        }
        Ok(())
    }
}

/// Join tag names into the single persisted string, e.g. `"fast,v2"`
pub fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(&TAG_SEPARATOR.to_string())
}

/// Split a persisted tag string back into the tag set
///
/// An empty string yields an empty set.
pub fn split_tags(joined: &str) -> BTreeSet<String> {
    joined
        .split(TAG_SEPARATOR)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimRecord {
        SimRecord::new(
            "run1",
            "g1",
            Utc::now(),
            Executable::new("Python", "/usr/bin/python"),
            Repository::new("git", "https://example.com/model.git"),
            LaunchMode::Serial,
            Datastore::FileSystem {
                root: "/tmp/data".to_string(),
            },
            ParameterSet::new("simple"),
        )
    }

    #[test]
    fn test_join_tags_sorted() {
        let record = sample().with_tag("v2").with_tag("fast");
        assert_eq!(record.joined_tags(), "fast,v2");
    }

    #[test]
    fn test_split_tags_empty() {
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_split_tags_round_trip() {
        let tags = split_tags("fast,v2");
        assert_eq!(join_tags(&tags), "fast,v2");
        assert!(tags.contains("fast"));
        assert!(tags.contains("v2"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().with_tag("fast").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let mut record = sample();
        record.label = "  ".to_string();
        assert_eq!(record.validate(), Err(RecordError::EmptyLabel));
    }

    #[test]
    fn test_validate_rejects_comma_in_tag() {
        let record = sample().with_tag("a,b");
        assert!(matches!(
            record.validate(),
            Err(RecordError::InvalidTag { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let mut record = sample();
        record.group = String::new();
        assert!(matches!(
            record.validate(),
            Err(RecordError::EmptyGroup { .. })
        ));
    }
}
