// Shared fixtures for record store integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use simrec_core::model::{
    Datastore, Dependency, Executable, LaunchMode, ParameterSet, PlatformInformation, Repository,
    SimRecord,
};
use simrec_store::SqliteRecordStore;

pub fn setup_store() -> SqliteRecordStore {
    SqliteRecordStore::open_in_memory().expect("Failed to open in-memory store")
}

pub fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 41, 12).unwrap() + chrono::Duration::nanoseconds(250_000_001)
}

pub fn neuron() -> Executable {
    Executable::new("NEURON", "/opt/nrn/bin/nrniv").with_version("8.2.2")
}

pub fn git_repo() -> Repository {
    Repository::new("GitRepository", "https://example.org/lab/model.git")
}

pub fn parameters(cm: f64) -> ParameterSet {
    ParameterSet::new("simple")
        .with_value("cm", serde_json::json!(cm))
        .with_value("tstop", serde_json::json!(1000))
}

pub fn workstation() -> PlatformInformation {
    PlatformInformation {
        architecture_bits: "64bit".to_string(),
        architecture_linkage: "ELF".to_string(),
        machine: "x86_64".to_string(),
        network_name: "bench01".to_string(),
        ip_addr: "10.0.0.12".to_string(),
        processor: "x86_64".to_string(),
        release: "6.1.0".to_string(),
        system_name: "Linux".to_string(),
        version: "#1 SMP".to_string(),
    }
}

/// Record with only the required fields set
pub fn minimal_record(label: &str, group: &str) -> SimRecord {
    SimRecord::new(
        label,
        group,
        fixed_timestamp(),
        neuron(),
        git_repo(),
        LaunchMode::Serial,
        Datastore::FileSystem {
            root: "/data/runs".to_string(),
        },
        parameters(1.0),
    )
}

/// Record with every field populated
pub fn full_record(label: &str, group: &str) -> SimRecord {
    let mut record = minimal_record(label, group)
        .with_tag("v2")
        .with_tag("fast");
    record.reason = Some("check spike threshold".to_string());
    record.duration = Some(12.5);
    record.outcome = Some("threshold confirmed".to_string());
    record.main_file = Some("run.py".to_string());
    record.version = Some("4f2a9c1".to_string());
    record.data_key = "[run1/output.dat]".to_string();
    record.diff = "--- a/run.py\n+++ b/run.py\n".to_string();
    record.launch_mode = LaunchMode::Distributed {
        n: 4,
        mpirun: "mpiexec".to_string(),
        hosts: vec!["node1".to_string(), "node2".to_string()],
    };
    record.dependencies = vec![
        Dependency::new("numpy", "/usr/lib/python3/numpy", "1.26.4"),
        Dependency::new("neuron", "/opt/nrn/lib/python", "8.2.2").with_module("python"),
        Dependency::new("brian2", "/usr/lib/python3/brian2", "2.5").with_diff("local patch"),
    ];
    record.platforms = vec![workstation()];
    record
}

pub fn count_rows(store: &SqliteRecordStore, table: &str) -> i64 {
    store
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
}
