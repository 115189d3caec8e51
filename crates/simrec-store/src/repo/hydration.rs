//! Hydration layer - rebuilds domain records from SQLite rows
//!
//! Reference entities shared by many records are loaded once per call and
//! reused from a per-call cache.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::references::ReferenceEntity;
use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use simrec_core::errors::RecordError;
use simrec_core::model::{
    split_tags, Datastore, Dependency, Executable, LaunchMode, ParameterSet, PlatformInformation,
    Repository, SimRecord,
};
use std::collections::HashMap;

const RECORD_COLUMNS: &str = "r.label, g.label, r.timestamp, r.reason, r.duration, r.outcome, \
     r.main_file, r.version, r.data_key, r.diff, r.tags, r.executable_id, r.repository_id, \
     r.launch_mode_id, r.datastore_id, r.parameters_id";

/// Raw `simulation_records` row joined with its group label
struct RecordRow {
    label: String,
    group: String,
    timestamp: String,
    reason: Option<String>,
    duration: Option<f64>,
    outcome: Option<String>,
    main_file: Option<String>,
    version: Option<String>,
    data_key: String,
    diff: String,
    tags: String,
    executable_id: i64,
    repository_id: i64,
    launch_mode_id: i64,
    datastore_id: i64,
    parameters_id: i64,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            label: row.get(0)?,
            group: row.get(1)?,
            timestamp: row.get(2)?,
            reason: row.get(3)?,
            duration: row.get(4)?,
            outcome: row.get(5)?,
            main_file: row.get(6)?,
            version: row.get(7)?,
            data_key: row.get(8)?,
            diff: row.get(9)?,
            tags: row.get(10)?,
            executable_id: row.get(11)?,
            repository_id: row.get(12)?,
            launch_mode_id: row.get(13)?,
            datastore_id: row.get(14)?,
            parameters_id: row.get(15)?,
        })
    }
}

/// Reference entities already loaded during one hydration call
struct ReferenceCache<E> {
    loaded: HashMap<i64, E>,
}

impl<E: ReferenceEntity + Clone> ReferenceCache<E> {
    fn new() -> Self {
        Self {
            loaded: HashMap::new(),
        }
    }

    fn get(&mut self, conn: &Connection, id: i64) -> Result<E> {
        if let Some(entity) = self.loaded.get(&id) {
            return Ok(entity.clone());
        }
        let entity = E::load(conn, id)?;
        self.loaded.insert(id, entity.clone());
        Ok(entity)
    }
}

/// Per-call caches for every reference kind
struct Hydrator<'c> {
    conn: &'c Connection,
    executables: ReferenceCache<Executable>,
    repositories: ReferenceCache<Repository>,
    launch_modes: ReferenceCache<LaunchMode>,
    datastores: ReferenceCache<Datastore>,
    parameters: ReferenceCache<ParameterSet>,
    dependencies: ReferenceCache<Dependency>,
    platforms: ReferenceCache<PlatformInformation>,
}

impl<'c> Hydrator<'c> {
    fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            executables: ReferenceCache::new(),
            repositories: ReferenceCache::new(),
            launch_modes: ReferenceCache::new(),
            datastores: ReferenceCache::new(),
            parameters: ReferenceCache::new(),
            dependencies: ReferenceCache::new(),
            platforms: ReferenceCache::new(),
        }
    }

    fn hydrate(&mut self, row: RecordRow) -> Result<SimRecord> {
        let timestamp = parse_timestamp(&row.timestamp).map_err(|reason| {
            RecordError::CorruptRow {
                table: "simulation_records".to_string(),
                reason: format!("label {}: {}", row.label, reason),
            }
        })?;

        let mut record = SimRecord::new(
            row.label,
            row.group,
            timestamp,
            self.executables.get(self.conn, row.executable_id)?,
            self.repositories.get(self.conn, row.repository_id)?,
            self.launch_modes.get(self.conn, row.launch_mode_id)?,
            self.datastores.get(self.conn, row.datastore_id)?,
            self.parameters.get(self.conn, row.parameters_id)?,
        );
        record.reason = row.reason;
        record.duration = row.duration;
        record.outcome = row.outcome;
        record.main_file = row.main_file;
        record.version = row.version;
        record.data_key = row.data_key;
        record.diff = row.diff;
        record.tags = split_tags(&row.tags);

        for id in linked_ids(self.conn, "record_dependencies", "dependency_id", &record.label)? {
            record.dependencies.push(self.dependencies.get(self.conn, id)?);
        }
        for id in linked_ids(self.conn, "record_platforms", "platform_id", &record.label)? {
            record.platforms.push(self.platforms.get(self.conn, id)?);
        }

        Ok(record)
    }
}

/// Canonical text form of a record timestamp (RFC 3339, nanoseconds, `Z`)
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

fn parse_timestamp(text: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.with_timezone(&Utc))
}

/// Ids linked to a record through a link table, in stored order
fn linked_ids(conn: &Connection, table: &str, column: &str, label: &str) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM {} WHERE record_label = ?1 ORDER BY position",
            column, table
        ))
        .map_err(from_rusqlite)?;

    let ids = stmt
        .query_map([label], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<i64>, _>>()
        .map_err(from_rusqlite)?;

    Ok(ids)
}

/// `WHERE` clause restricting to `groups` (empty slice means no restriction)
fn group_filter(groups: &[&str]) -> String {
    if groups.is_empty() {
        String::new()
    } else {
        let placeholders = vec!["?"; groups.len()].join(", ");
        format!(" WHERE g.label IN ({})", placeholders)
    }
}

/// Load the record with `label`, if stored
pub fn load_record(conn: &Connection, label: &str) -> Result<Option<SimRecord>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {} FROM simulation_records r
                 JOIN simulation_groups g ON g.id = r.group_id
                 WHERE r.label = ?1",
                RECORD_COLUMNS
            ),
            [label],
            RecordRow::from_row,
        )
        .optional()
        .map_err(from_rusqlite)?;

    match row {
        Some(row) => Hydrator::new(conn).hydrate(row).map(Some),
        None => Ok(None),
    }
}

/// Load all records, or those in `groups` when non-empty, in insertion order
pub fn load_records(conn: &Connection, groups: &[&str]) -> Result<Vec<SimRecord>> {
    let sql = format!(
        "SELECT {} FROM simulation_records r
         JOIN simulation_groups g ON g.id = r.group_id{}
         ORDER BY r.rowid",
        RECORD_COLUMNS,
        group_filter(groups)
    );

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params_from_iter(groups.iter()), RecordRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    let mut hydrator = Hydrator::new(conn);
    rows.into_iter().map(|row| hydrator.hydrate(row)).collect()
}

/// Labels of all records, or those in `groups` when non-empty, in insertion order
pub fn load_labels(conn: &Connection, groups: &[&str]) -> Result<Vec<String>> {
    let sql = format!(
        "SELECT r.label FROM simulation_records r
         JOIN simulation_groups g ON g.id = r.group_id{}
         ORDER BY r.rowid",
        group_filter(groups)
    );

    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let labels = stmt
        .query_map(params_from_iter(groups.iter()), |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;

    Ok(labels)
}

/// Labels of every stored group, sorted
pub fn load_group_labels(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT label FROM simulation_groups ORDER BY label")
        .map_err(from_rusqlite)?;
    let labels = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_text_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let text = format_timestamp(&ts);
        assert_eq!(text, "2024-03-01T12:30:05.123456789Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn test_group_filter_placeholders() {
        assert_eq!(group_filter(&[]), "");
        assert_eq!(group_filter(&["g1", "g2"]), " WHERE g.label IN (?, ?)");
    }
}
