//! Record store interface.
//!
//! Backends persist [`SimRecord`]s and hand them back by label, group or tag.

use crate::errors::ExError;
use crate::model::SimRecord;

/// Persistent collection of simulation records.
#[allow(clippy::result_large_err)]
pub trait RecordStore {
    /// Insert or update a record.
    ///
    /// Saving an unchanged record again leaves the stored state unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for records that cannot be persisted faithfully,
    /// `Persistence` for backend failures.
    fn save(&mut self, record: &SimRecord) -> Result<(), ExError>;

    /// Fetch the record with the given label.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this label.
    fn get(&mut self, label: &str) -> Result<SimRecord, ExError>;

    /// All records, or only those in `groups` when it is non-empty.
    ///
    /// # Errors
    ///
    /// `Persistence` for backend failures.
    fn list(&mut self, groups: &[&str]) -> Result<Vec<SimRecord>, ExError>;

    /// Labels of the records [`RecordStore::list`] would return.
    ///
    /// # Errors
    ///
    /// `Persistence` for backend failures.
    fn labels(&mut self, groups: &[&str]) -> Result<Vec<String>, ExError>;

    /// Remove the record with the given label.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this label.
    fn delete(&mut self, label: &str) -> Result<(), ExError>;

    /// Remove a group and all of its records, returning how many records went.
    ///
    /// # Errors
    ///
    /// `NotFound` if the group does not exist.
    fn delete_group(&mut self, group_label: &str) -> Result<usize, ExError>;

    /// Remove every record carrying `tag`.
    ///
    /// # Errors
    ///
    /// Always `NotImplemented`.
    fn delete_by_tag(&mut self, tag: &str) -> Result<usize, ExError>;

    /// Labels of every stored group.
    ///
    /// # Errors
    ///
    /// `Persistence` for backend failures.
    fn groups(&mut self) -> Result<Vec<String>, ExError>;
}
