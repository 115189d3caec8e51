// Integration tests for get-or-create storage of shared reference entities

mod common;

use common::*;
use simrec_core::model::{Executable, LaunchMode};
use simrec_core::{RecordStore, ReferenceKind};
use simrec_core::model::ParameterSet;
use simrec_store::repo::references::count;
use simrec_store::SqliteRecordStore;
use tempfile::TempDir;

#[test]
fn test_saving_twice_is_idempotent() {
    // Given: A fully populated record
    let mut store = setup_store();
    let record = full_record("run1", "g1");

    // When: It is saved twice
    store.save(&record).unwrap();
    store.save(&record).unwrap();

    // Then: Exactly one row exists for the record and for each reference
    assert_eq!(count_rows(&store, "simulation_records"), 1);
    assert_eq!(count_rows(&store, "simulation_groups"), 1);
    for kind in ReferenceKind::ALL {
        let expected = match kind {
            ReferenceKind::Dependency => 3,
            _ => 1,
        };
        assert_eq!(count(store.connection(), kind).unwrap(), expected, "{}", kind);
    }
    assert_eq!(store.get("run1").unwrap(), record);
}

#[test]
fn test_records_share_equal_references() {
    let mut store = setup_store();
    store.save(&full_record("run1", "g1")).unwrap();
    store.save(&full_record("run2", "g2")).unwrap();

    let conn = store.connection();
    assert_eq!(count(conn, ReferenceKind::Executable).unwrap(), 1);
    assert_eq!(count(conn, ReferenceKind::PlatformInformation).unwrap(), 1);
    assert_eq!(count(conn, ReferenceKind::Dependency).unwrap(), 3);

    let shared: i64 = conn
        .query_row(
            "SELECT COUNT(DISTINCT executable_id) FROM simulation_records",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(shared, 1);
}

#[test]
fn test_differing_content_creates_new_rows() {
    let mut store = setup_store();
    store.save(&minimal_record("run1", "g1")).unwrap();

    let mut other = minimal_record("run2", "g1");
    other.executable = Executable::new("NEURON", "/opt/nrn/bin/nrniv").with_version("9.0");
    other.parameters = parameters(2.0);
    store.save(&other).unwrap();

    let conn = store.connection();
    assert_eq!(count(conn, ReferenceKind::Executable).unwrap(), 2);
    assert_eq!(count(conn, ReferenceKind::ParameterSet).unwrap(), 2);
    assert_eq!(count(conn, ReferenceKind::Repository).unwrap(), 1);
    assert_eq!(store.get("run2").unwrap().executable, other.executable);
}

#[test]
fn test_launch_modes_with_different_hosts_are_distinct() {
    let mut store = setup_store();
    let mut first = minimal_record("run1", "g1");
    first.launch_mode = LaunchMode::Distributed {
        n: 2,
        mpirun: "mpiexec".to_string(),
        hosts: vec!["node1".to_string()],
    };
    let mut second = minimal_record("run2", "g1");
    second.launch_mode = LaunchMode::Distributed {
        n: 2,
        mpirun: "mpiexec".to_string(),
        hosts: vec!["node2".to_string()],
    };

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    assert_eq!(count(store.connection(), ReferenceKind::LaunchMode).unwrap(), 2);
    assert_eq!(store.get("run1").unwrap().launch_mode, first.launch_mode);
    assert_eq!(store.get("run2").unwrap().launch_mode, second.launch_mode);
}

#[test]
fn test_list_reuses_references_across_records() {
    let mut store = setup_store();
    for i in 0..5 {
        store.save(&full_record(&format!("run{}", i), "g1")).unwrap();
    }

    let records = store.list(&["g1"]).unwrap();

    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.executable == neuron()));
    assert!(records.iter().all(|r| r.dependencies.len() == 3));
}

#[test]
fn test_float_parameters_survive_save_get_save() {
    // Given: Parameters whose shortest decimal form needs exact float parsing
    let mut store = setup_store();
    let mut record = minimal_record("run1", "g1");
    record.parameters = ParameterSet::new("simple")
        .with_value("gleak", serde_json::json!(0.009540538003165153))
        .with_value("gnabar", serde_json::json!(0.014802059736298941))
        .with_value("ena", serde_json::json!(1.0e-300))
        .with_value("scale", serde_json::json!(2.2250738585072014e-308));
    store.save(&record).unwrap();

    // When: The record is loaded and saved again under a new label
    let loaded = store.get("run1").unwrap();
    let mut copy = loaded.clone();
    copy.label = "run2".to_string();
    store.save(&copy).unwrap();

    // Then: The loaded record is equal and both share one parameter row
    assert_eq!(loaded, record);
    assert_eq!(count(store.connection(), ReferenceKind::ParameterSet).unwrap(), 1);
}

#[test]
fn test_two_handles_on_one_file_share_reference_rows() {
    // Given: Two stores opened on the same database file
    let dir = TempDir::new().unwrap();
    let db_file = dir.path().join("shared.db");
    let mut first = SqliteRecordStore::open_path(&db_file).unwrap();
    let mut second = SqliteRecordStore::open_path(&db_file).unwrap();

    // When: Each saves a record with the same references
    first.save(&full_record("run1", "g1")).unwrap();
    second.save(&full_record("run2", "g2")).unwrap();

    // Then: Every reference kind has the rows of a single record
    for kind in ReferenceKind::ALL {
        let expected = match kind {
            ReferenceKind::Dependency => 3,
            _ => 1,
        };
        assert_eq!(count(first.connection(), kind).unwrap(), expected, "{}", kind);
    }

    // And: Both records point at the same executable and parameter rows
    let ids: Vec<(i64, i64)> = {
        let mut stmt = first
            .connection()
            .prepare(
                "SELECT executable_id, parameters_id FROM simulation_records ORDER BY label",
            )
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    };
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);

    // And: Each handle sees the other's record
    assert_eq!(first.get("run2").unwrap(), full_record("run2", "g2"));
    assert_eq!(second.get("run1").unwrap(), full_record("run1", "g1"));
}
