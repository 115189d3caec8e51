//! Get-or-create resolution of shared reference entities
//!
//! Every reference table carries a `UNIQUE` content key. Resolution inserts
//! with `ON CONFLICT(content_key) DO NOTHING` and then selects the row id, so
//! equal content always ends up on one row, even with several writers.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, missing_row, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use simrec_core::errors::RecordError;
use simrec_core::model::{
    Datastore, Dependency, Executable, LaunchMode, ParameterSet, PlatformInformation, Repository,
};
use simrec_core::{ContentIdentity, ReferenceKind};

/// Table holding each reference kind
pub const fn table_for(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Executable => "executables",
        ReferenceKind::Repository => "repositories",
        ReferenceKind::LaunchMode => "launch_modes",
        ReferenceKind::Datastore => "datastores",
        ReferenceKind::ParameterSet => "parameter_sets",
        ReferenceKind::Dependency => "dependencies",
        ReferenceKind::PlatformInformation => "platform_information",
    }
}

/// A reference entity with a row mapping in its table
pub trait ReferenceEntity: ContentIdentity + Sized {
    /// Table this entity is stored in
    const TABLE: &'static str = table_for(Self::KIND);

    /// Insert a row for `self` keyed by `content_key`, doing nothing if the key exists.
    ///
    /// Returns the number of rows inserted (0 or 1).
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize>;

    /// Load the entity stored at `id`
    fn load(conn: &Connection, id: i64) -> Result<Self>;
}

/// Resolve `entity` to the id of its row, creating the row if needed
pub fn resolve<E: ReferenceEntity>(conn: &Connection, entity: &E) -> Result<i64> {
    let content_key = entity.content_key()?;

    let inserted = entity.insert_row(conn, &content_key)?;

    let id = find_id(conn, E::TABLE, &content_key)?
        .ok_or_else(|| missing_row(E::TABLE, &content_key))?;

    tracing::debug!(
        reference_kind = E::KIND.as_str(),
        content_key = %content_key,
        id,
        created = inserted > 0,
        "resolved reference entity"
    );

    Ok(id)
}

/// Resolve a list of entities, keeping their order
pub fn resolve_all<E: ReferenceEntity>(conn: &Connection, entities: &[E]) -> Result<Vec<i64>> {
    entities.iter().map(|e| resolve(conn, e)).collect()
}

/// Row id for a content key, if present
pub fn find_id(conn: &Connection, table: &str, content_key: &str) -> Result<Option<i64>> {
    conn.query_row(
        &format!("SELECT id FROM {} WHERE content_key = ?1", table),
        [content_key],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Number of rows stored for a reference kind
pub fn count(conn: &Connection, kind: ReferenceKind) -> Result<i64> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", table_for(kind)),
        [],
        |row| row.get(0),
    )
    .map_err(from_rusqlite)
}

fn select_by_id<T, F>(conn: &Connection, table: &str, columns: &str, id: i64, map: F) -> Result<T>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    conn.query_row(
        &format!("SELECT {} FROM {} WHERE id = ?1", columns, table),
        [id],
        map,
    )
    .map_err(from_rusqlite)
}

fn corrupt(table: &str, id: i64, reason: impl std::fmt::Display) -> RecordError {
    RecordError::CorruptRow {
        table: table.to_string(),
        reason: format!("id {}: {}", id, reason),
    }
}

impl ReferenceEntity for Executable {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        conn.execute(
            "INSERT INTO executables (content_key, name, path, version, options)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(content_key) DO NOTHING",
            params![content_key, self.name, self.path, self.version, self.options],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        select_by_id(conn, Self::TABLE, "name, path, version, options", id, |row| {
            Ok(Executable {
                name: row.get(0)?,
                path: row.get(1)?,
                version: row.get(2)?,
                options: row.get(3)?,
            })
        })
    }
}

impl ReferenceEntity for Repository {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        conn.execute(
            "INSERT INTO repositories (content_key, kind, url)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(content_key) DO NOTHING",
            params![content_key, self.kind, self.url],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        select_by_id(conn, Self::TABLE, "kind, url", id, |row| {
            Ok(Repository {
                kind: row.get(0)?,
                url: row.get(1)?,
            })
        })
    }
}

impl ReferenceEntity for LaunchMode {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        let (n_processes, mpirun, hosts) = match self {
            LaunchMode::Serial => (None, None, None),
            LaunchMode::Distributed { n, mpirun, hosts } => (
                Some(*n),
                Some(mpirun.as_str()),
                Some(serde_json::to_string(hosts).map_err(RecordError::from)?),
            ),
        };

        conn.execute(
            "INSERT INTO launch_modes (content_key, kind, n_processes, mpirun, hosts)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(content_key) DO NOTHING",
            params![content_key, self.kind(), n_processes, mpirun, hosts],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        let (kind, n_processes, mpirun, hosts): (
            String,
            Option<u32>,
            Option<String>,
            Option<String>,
        ) = select_by_id(conn, Self::TABLE, "kind, n_processes, mpirun, hosts", id, |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        match kind.as_str() {
            "serial" => Ok(LaunchMode::Serial),
            "distributed" => {
                let n = n_processes
                    .ok_or_else(|| corrupt(Self::TABLE, id, "distributed launch without n_processes"))?;
                let hosts = match hosts {
                    Some(json) => serde_json::from_str(&json)
                        .map_err(|e| corrupt(Self::TABLE, id, e))?,
                    None => Vec::new(),
                };
                Ok(LaunchMode::Distributed {
                    n,
                    mpirun: mpirun.unwrap_or_default(),
                    hosts,
                })
            }
            other => Err(corrupt(Self::TABLE, id, format!("unknown launch mode '{}'", other)).into()),
        }
    }
}

impl ReferenceEntity for Datastore {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        conn.execute(
            "INSERT INTO datastores (content_key, kind, root)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(content_key) DO NOTHING",
            params![content_key, self.kind(), self.root()],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        let (kind, root): (String, String) =
            select_by_id(conn, Self::TABLE, "kind, root", id, |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;

        match kind.as_str() {
            "file_system" => Ok(Datastore::FileSystem { root }),
            other => Err(corrupt(Self::TABLE, id, format!("unknown datastore '{}'", other)).into()),
        }
    }
}

impl ReferenceEntity for ParameterSet {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        let content = serde_json::to_string(&self.values).map_err(RecordError::from)?;
        conn.execute(
            "INSERT INTO parameter_sets (content_key, format, content)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(content_key) DO NOTHING",
            params![content_key, self.format, content],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        let (format, content): (String, String) =
            select_by_id(conn, Self::TABLE, "format, content", id, |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;

        let values = serde_json::from_str(&content).map_err(|e| corrupt(Self::TABLE, id, e))?;
        Ok(ParameterSet { format, values })
    }
}

impl ReferenceEntity for Dependency {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        conn.execute(
            "INSERT INTO dependencies (content_key, name, path, version, module, diff)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(content_key) DO NOTHING",
            params![
                content_key,
                self.name,
                self.path,
                self.version,
                self.module,
                self.diff
            ],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        select_by_id(
            conn,
            Self::TABLE,
            "name, path, version, module, diff",
            id,
            |row| {
                Ok(Dependency {
                    name: row.get(0)?,
                    path: row.get(1)?,
                    version: row.get(2)?,
                    module: row.get(3)?,
                    diff: row.get(4)?,
                })
            },
        )
    }
}

impl ReferenceEntity for PlatformInformation {
    fn insert_row(&self, conn: &Connection, content_key: &str) -> Result<usize> {
        conn.execute(
            "INSERT INTO platform_information (
                content_key, architecture_bits, architecture_linkage, machine, network_name,
                ip_addr, processor, release, system_name, version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(content_key) DO NOTHING",
            params![
                content_key,
                self.architecture_bits,
                self.architecture_linkage,
                self.machine,
                self.network_name,
                self.ip_addr,
                self.processor,
                self.release,
                self.system_name,
                self.version
            ],
        )
        .map_err(from_rusqlite)
    }

    fn load(conn: &Connection, id: i64) -> Result<Self> {
        select_by_id(
            conn,
            Self::TABLE,
            "architecture_bits, architecture_linkage, machine, network_name, ip_addr, \
             processor, release, system_name, version",
            id,
            |row| {
                Ok(PlatformInformation {
                    architecture_bits: row.get(0)?,
                    architecture_linkage: row.get(1)?,
                    machine: row.get(2)?,
                    network_name: row.get(3)?,
                    ip_addr: row.get(4)?,
                    processor: row.get(5)?,
                    release: row.get(6)?,
                    system_name: row.get(7)?,
                    version: row.get(8)?,
                })
            },
        )
    }
}
