//! SQLite-backed record store
//!
//! `SqliteRecordStore` owns one connection and implements
//! [`RecordStore`]. It owns lifecycle logging for every public operation
//! (`log_op_start!` / `log_op_end!` / `log_op_error!`); the helpers below it
//! only log at debug level.

#![allow(clippy::result_large_err)]

use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::repo::hydration::{self, format_timestamp};
use crate::repo::references::{resolve, resolve_all};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use simrec_core::errors::{ExError, RecordError};
use simrec_core::model::SimRecord;
use simrec_core::{log_op_end, log_op_error, log_op_start, RecordStore};
use std::time::Instant;

/// Record store persisting simulation records in a SQLite database file
pub struct SqliteRecordStore {
    config: StoreConfig,
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (creating if necessary) the store described by `config`
    ///
    /// Creates the parent directory of the database file when missing and
    /// brings the schema up to date.
    ///
    /// # Errors
    ///
    /// - `Io` if the parent directory cannot be created
    /// - `Persistence` if the database cannot be opened or migrated
    /// - `ConstraintViolation` if an applied migration was altered
    pub fn open(config: StoreConfig) -> Result<Self> {
        let mut conn = if config.is_in_memory() {
            db::open_in_memory()?
        } else {
            db::ensure_parent_dir(config.db_file())?;
            let fresh = !config.db_file().exists();
            let conn = db::open(config.db_file())?;
            tracing::debug!(db_file = %config, fresh, "opened record store database");
            conn
        };

        db::configure(&conn, !config.is_in_memory())?;
        apply_migrations(&mut conn)?;

        Ok(Self { config, conn })
    }

    /// Open the store whose database file is `db_file`
    ///
    /// # Errors
    ///
    /// See [`SqliteRecordStore::open`].
    pub fn open_path(db_file: impl Into<std::path::PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(db_file))
    }

    /// Open a private in-memory store
    ///
    /// # Errors
    ///
    /// See [`SqliteRecordStore::open`].
    pub fn open_in_memory() -> Result<Self> {
        Self::open(StoreConfig::in_memory())
    }

    /// The configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying connection, for inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn save_impl(&mut self, record: &SimRecord) -> Result<()> {
        record.validate()?;

        let tx = self.conn.transaction().map_err(from_rusqlite)?;

        let group_id = get_or_create_group(&tx, &record.group)?;
        let refs = ResolvedReferences::resolve(&tx, record)?;
        let timestamp = format_timestamp(&record.timestamp);

        if find_record(&tx, &record.label, group_id, &timestamp)? {
            update_record(&tx, record, &refs)?;
        } else {
            insert_record(&tx, record, group_id, &timestamp, &refs)?;
        }

        replace_links(&tx, "record_dependencies", "dependency_id", &record.label, &refs.dependencies)?;
        replace_links(&tx, "record_platforms", "platform_id", &record.label, &refs.platforms)?;

        tx.commit().map_err(from_rusqlite)?;
        Ok(())
    }

    fn get_impl(&self, label: &str) -> Result<SimRecord> {
        hydration::load_record(&self.conn, label)?.ok_or_else(|| {
            RecordError::RecordNotFound {
                label: label.to_string(),
            }
            .into()
        })
    }

    fn delete_impl(&mut self, label: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM simulation_records WHERE label = ?1", [label])
            .map_err(from_rusqlite)?;

        if deleted == 0 {
            return Err(RecordError::RecordNotFound {
                label: label.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn delete_group_impl(&mut self, group_label: &str) -> Result<usize> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;

        // Lookup only: a missing group must not be recreated by deleting it.
        let group_id = find_group(&tx, group_label)?.ok_or_else(|| RecordError::GroupNotFound {
            group: group_label.to_string(),
        })?;

        let deleted = tx
            .execute(
                "DELETE FROM simulation_records WHERE group_id = ?1",
                [group_id],
            )
            .map_err(from_rusqlite)?;
        tx.execute("DELETE FROM simulation_groups WHERE id = ?1", [group_id])
            .map_err(from_rusqlite)?;

        tx.commit().map_err(from_rusqlite)?;
        Ok(deleted)
    }
}

/// Row ids of everything a record points at
struct ResolvedReferences {
    executable: i64,
    repository: i64,
    launch_mode: i64,
    datastore: i64,
    parameters: i64,
    dependencies: Vec<i64>,
    platforms: Vec<i64>,
}

impl ResolvedReferences {
    fn resolve(conn: &Connection, record: &SimRecord) -> Result<Self> {
        Ok(Self {
            executable: resolve(conn, &record.executable)?,
            repository: resolve(conn, &record.repository)?,
            launch_mode: resolve(conn, &record.launch_mode)?,
            datastore: resolve(conn, &record.datastore)?,
            parameters: resolve(conn, &record.parameters)?,
            dependencies: resolve_all(conn, &record.dependencies)?,
            platforms: resolve_all(conn, &record.platforms)?,
        })
    }
}

fn find_group(conn: &Connection, group_label: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM simulation_groups WHERE label = ?1",
        [group_label],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn get_or_create_group(tx: &Transaction<'_>, group_label: &str) -> Result<i64> {
    let created = tx
        .execute(
            "INSERT INTO simulation_groups (label, created_at) VALUES (?1, ?2)
             ON CONFLICT(label) DO NOTHING",
            params![group_label, chrono::Utc::now().timestamp()],
        )
        .map_err(from_rusqlite)?;
    if created > 0 {
        tracing::debug!(group = group_label, "created simulation group");
    }

    find_group(tx, group_label)?.ok_or_else(|| {
        RecordError::GroupNotFound {
            group: group_label.to_string(),
        }
        .into()
    })
}

/// Whether a record row with this exact (label, group, timestamp) exists
fn find_record(tx: &Transaction<'_>, label: &str, group_id: i64, timestamp: &str) -> Result<bool> {
    let found = tx
        .query_row(
            "SELECT 1 FROM simulation_records
             WHERE label = ?1 AND group_id = ?2 AND timestamp = ?3",
            params![label, group_id, timestamp],
            |_| Ok(()),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}

fn insert_record(
    tx: &Transaction<'_>,
    record: &SimRecord,
    group_id: i64,
    timestamp: &str,
    refs: &ResolvedReferences,
) -> Result<()> {
    tx.execute(
        "INSERT INTO simulation_records (
            label, group_id, timestamp, reason, duration, outcome, main_file, version,
            data_key, diff, tags, executable_id, repository_id, launch_mode_id,
            datastore_id, parameters_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            record.label,
            group_id,
            timestamp,
            record.reason,
            record.duration,
            record.outcome,
            record.main_file,
            record.version,
            record.data_key,
            record.diff,
            record.joined_tags(),
            refs.executable,
            refs.repository,
            refs.launch_mode,
            refs.datastore,
            refs.parameters,
        ],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(label = %record.label, "inserted simulation record");
    Ok(())
}

/// Update an existing row; absent optional fields keep their stored value
fn update_record(tx: &Transaction<'_>, record: &SimRecord, refs: &ResolvedReferences) -> Result<()> {
    tx.execute(
        "UPDATE simulation_records SET
            reason = COALESCE(?2, reason),
            duration = COALESCE(?3, duration),
            outcome = COALESCE(?4, outcome),
            main_file = COALESCE(?5, main_file),
            version = COALESCE(?6, version),
            data_key = ?7,
            diff = ?8,
            tags = ?9,
            executable_id = ?10,
            repository_id = ?11,
            launch_mode_id = ?12,
            datastore_id = ?13,
            parameters_id = ?14
         WHERE label = ?1",
        params![
            record.label,
            record.reason,
            record.duration,
            record.outcome,
            record.main_file,
            record.version,
            record.data_key,
            record.diff,
            record.joined_tags(),
            refs.executable,
            refs.repository,
            refs.launch_mode,
            refs.datastore,
            refs.parameters,
        ],
    )
    .map_err(from_rusqlite)?;

    tracing::debug!(label = %record.label, "updated simulation record");
    Ok(())
}

/// Overwrite a record's ordered link set
fn replace_links(
    tx: &Transaction<'_>,
    table: &str,
    column: &str,
    label: &str,
    ids: &[i64],
) -> Result<()> {
    tx.execute(
        &format!("DELETE FROM {} WHERE record_label = ?1", table),
        [label],
    )
    .map_err(from_rusqlite)?;

    let mut stmt = tx
        .prepare(&format!(
            "INSERT INTO {} (record_label, position, {}) VALUES (?1, ?2, ?3)",
            table, column
        ))
        .map_err(from_rusqlite)?;
    for (position, id) in ids.iter().enumerate() {
        stmt.execute(params![label, position as i64, id])
            .map_err(from_rusqlite)?;
    }

    Ok(())
}

fn elapsed_ms(start: &Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

impl RecordStore for SqliteRecordStore {
    fn save(&mut self, record: &SimRecord) -> std::result::Result<(), ExError> {
        log_op_start!(
            "save_record",
            label = record.label.as_str(),
            group = record.group.as_str()
        );
        let start = Instant::now();

        self.save_impl(record).map_err(|e| {
            log_op_error!(
                "save_record",
                e.clone(),
                duration_ms = elapsed_ms(&start),
                label = record.label.as_str()
            );
            e
        })?;

        log_op_end!(
            "save_record",
            duration_ms = elapsed_ms(&start),
            label = record.label.as_str()
        );
        Ok(())
    }

    fn get(&mut self, label: &str) -> std::result::Result<SimRecord, ExError> {
        log_op_start!("get_record", label = label);
        let start = Instant::now();

        let record = self.get_impl(label).map_err(|e| {
            log_op_error!(
                "get_record",
                e.clone(),
                duration_ms = elapsed_ms(&start),
                label = label
            );
            e
        })?;

        log_op_end!("get_record", duration_ms = elapsed_ms(&start), label = label);
        Ok(record)
    }

    fn list(&mut self, groups: &[&str]) -> std::result::Result<Vec<SimRecord>, ExError> {
        log_op_start!("list_records", group_count = groups.len() as u64);
        let start = Instant::now();

        let records = hydration::load_records(&self.conn, groups).map_err(|e| {
            log_op_error!("list_records", e.clone(), duration_ms = elapsed_ms(&start));
            e
        })?;

        log_op_end!(
            "list_records",
            duration_ms = elapsed_ms(&start),
            record_count = records.len() as u64
        );
        Ok(records)
    }

    fn labels(&mut self, groups: &[&str]) -> std::result::Result<Vec<String>, ExError> {
        log_op_start!("list_labels", group_count = groups.len() as u64);
        let start = Instant::now();

        let labels = hydration::load_labels(&self.conn, groups).map_err(|e| {
            log_op_error!("list_labels", e.clone(), duration_ms = elapsed_ms(&start));
            e
        })?;

        log_op_end!(
            "list_labels",
            duration_ms = elapsed_ms(&start),
            record_count = labels.len() as u64
        );
        Ok(labels)
    }

    fn delete(&mut self, label: &str) -> std::result::Result<(), ExError> {
        log_op_start!("delete_record", label = label);
        let start = Instant::now();

        self.delete_impl(label).map_err(|e| {
            log_op_error!(
                "delete_record",
                e.clone(),
                duration_ms = elapsed_ms(&start),
                label = label
            );
            e
        })?;

        log_op_end!("delete_record", duration_ms = elapsed_ms(&start), label = label);
        Ok(())
    }

    fn delete_group(&mut self, group_label: &str) -> std::result::Result<usize, ExError> {
        log_op_start!("delete_group", group = group_label);
        let start = Instant::now();

        let deleted = self.delete_group_impl(group_label).map_err(|e| {
            log_op_error!(
                "delete_group",
                e.clone(),
                duration_ms = elapsed_ms(&start),
                group = group_label
            );
            e
        })?;

        log_op_end!(
            "delete_group",
            duration_ms = elapsed_ms(&start),
            group = group_label,
            record_count = deleted as u64
        );
        Ok(deleted)
    }

    fn delete_by_tag(&mut self, tag: &str) -> std::result::Result<usize, ExError> {
        log_op_start!("delete_by_tag", tag = tag);

        let err: ExError = RecordError::DeleteByTagNotImplemented {
            tag: tag.to_string(),
        }
        .into();
        log_op_error!(
            "delete_by_tag",
            err.clone(),
            duration_ms = 0_u64,
            tag = tag
        );
        Err(err)
    }

    fn groups(&mut self) -> std::result::Result<Vec<String>, ExError> {
        log_op_start!("list_groups");
        let start = Instant::now();

        let groups = hydration::load_group_labels(&self.conn).map_err(|e| {
            log_op_error!("list_groups", e.clone(), duration_ms = elapsed_ms(&start));
            e
        })?;

        log_op_end!(
            "list_groups",
            duration_ms = elapsed_ms(&start),
            group_count = groups.len() as u64
        );
        Ok(groups)
    }
}

impl std::fmt::Display for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Relational database record store (database file={})",
            self.config
        )
    }
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A store serializes as its database file path
impl Serialize for SqliteRecordStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.config.serialize(serializer)
    }
}

/// Deserializing a database file path reopens that store
impl<'de> Deserialize<'de> for SqliteRecordStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let config = StoreConfig::deserialize(deserializer)?;
        SqliteRecordStore::open(config).map_err(serde::de::Error::custom)
    }
}
