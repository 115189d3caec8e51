//! Content identity for shared reference entities
//!
//! Two records describing the same executable, repository, parameter set,
//! etc. must point at the same stored row. The row is found through a
//! content key: the SHA-256 hex digest of the entity's canonical JSON
//! (object keys sorted, no whitespace).

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::Result;
use crate::model::{
    Datastore, Dependency, Executable, LaunchMode, ParameterSet, PlatformInformation, Repository,
};

/// Kinds of shared reference entity a record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Executable,
    Repository,
    LaunchMode,
    Datastore,
    ParameterSet,
    Dependency,
    PlatformInformation,
}

impl ReferenceKind {
    /// Every kind, in the order a record save resolves them
    pub const ALL: [ReferenceKind; 7] = [
        ReferenceKind::Executable,
        ReferenceKind::Repository,
        ReferenceKind::LaunchMode,
        ReferenceKind::Datastore,
        ReferenceKind::ParameterSet,
        ReferenceKind::Dependency,
        ReferenceKind::PlatformInformation,
    ];

    /// Stable name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Executable => "executable",
            ReferenceKind::Repository => "repository",
            ReferenceKind::LaunchMode => "launch_mode",
            ReferenceKind::Datastore => "datastore",
            ReferenceKind::ParameterSet => "parameter_set",
            ReferenceKind::Dependency => "dependency",
            ReferenceKind::PlatformInformation => "platform_information",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain object deduplicated by content when persisted
pub trait ContentIdentity: Serialize {
    /// Which reference kind this type is
    const KIND: ReferenceKind;

    /// Deterministic key derived from the object's content
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the object cannot be encoded as JSON.
    fn content_key(&self) -> Result<String> {
        content_key(self)
    }
}

impl ContentIdentity for Executable {
    const KIND: ReferenceKind = ReferenceKind::Executable;
}

impl ContentIdentity for Repository {
    const KIND: ReferenceKind = ReferenceKind::Repository;
}

impl ContentIdentity for LaunchMode {
    const KIND: ReferenceKind = ReferenceKind::LaunchMode;
}

impl ContentIdentity for Datastore {
    const KIND: ReferenceKind = ReferenceKind::Datastore;
}

impl ContentIdentity for ParameterSet {
    const KIND: ReferenceKind = ReferenceKind::ParameterSet;
}

impl ContentIdentity for Dependency {
    const KIND: ReferenceKind = ReferenceKind::Dependency;
}

impl ContentIdentity for PlatformInformation {
    const KIND: ReferenceKind = ReferenceKind::PlatformInformation;
}

/// Compute the content key of any serializable value
///
/// The value is first converted to a `serde_json::Value`, whose objects are
/// key-sorted, so field declaration order does not leak into the digest.
///
/// # Errors
///
/// Returns `Serialization` if the value cannot be encoded as JSON.
pub fn content_key<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let canonical = serde_json::to_value(value)?;
    let json = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
