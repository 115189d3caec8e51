// Property tests for content keys of reference entities

use proptest::prelude::*;
use simrec_core::identity::content_key;
use simrec_core::model::{Dependency, Executable, ParameterSet, PlatformInformation};
use simrec_core::ContentIdentity;

fn executable_strategy() -> impl Strategy<Value = Executable> {
    (
        "[A-Za-z]{1,12}",
        "/[a-z/]{1,24}",
        proptest::option::of("[0-9]\\.[0-9]{1,2}"),
        proptest::option::of("-[a-z]{1,6}"),
    )
        .prop_map(|(name, path, version, options)| Executable {
            name,
            path,
            version,
            options,
        })
}

proptest! {
    #[test]
    fn prop_content_key_deterministic(exe in executable_strategy()) {
        let k1 = exe.content_key().unwrap();
        let k2 = exe.clone().content_key().unwrap();
        prop_assert_eq!(k1.len(), 64);
        prop_assert_eq!(k1, k2);
    }

    #[test]
    fn prop_distinct_paths_distinct_keys(
        exe in executable_strategy(),
        suffix in "[a-z]{1,8}",
    ) {
        let mut other = exe.clone();
        other.path = format!("{}/{}", exe.path, suffix);
        prop_assert_ne!(exe.content_key().unwrap(), other.content_key().unwrap());
    }

    #[test]
    fn prop_parameter_order_irrelevant(
        entries in proptest::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..8),
    ) {
        let forward = entries.iter().fold(ParameterSet::new("simple"), |ps, (k, v)| {
            ps.with_value(k.clone(), serde_json::json!(v))
        });
        let backward = entries.iter().rev().fold(ParameterSet::new("simple"), |ps, (k, v)| {
            ps.with_value(k.clone(), serde_json::json!(v))
        });
        prop_assert_eq!(forward.content_key().unwrap(), backward.content_key().unwrap());
    }
}

#[test]
fn test_kinds_do_not_share_keys_for_same_strings() {
    let dep = Dependency::new("numpy", "/usr/lib/numpy", "1.26");
    let platform = PlatformInformation {
        machine: "numpy".to_string(),
        ..Default::default()
    };
    assert_ne!(dep.content_key().unwrap(), platform.content_key().unwrap());
}

#[test]
fn test_free_function_matches_trait() {
    let exe = Executable::new("NEURON", "/opt/nrn/bin/nrniv").with_version("8.2");
    assert_eq!(content_key(&exe).unwrap(), exe.content_key().unwrap());
}
