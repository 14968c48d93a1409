//! Serialized records and catalog queries.

use binresolve::binary::{Binary, BinaryRecord};
use binresolve::catalog::{get_all_binaries, get_binary};
use binresolve::test_utils::{FakeBinDir, dir_provider};
use binresolve::utils::sha256_file;
use std::sync::Arc;

#[test]
fn resolved_record_round_trips_through_json() {
    let dir = FakeBinDir::new();
    let path = dir.add("wget", "GNU Wget 1.24.5 built on linux-gnu.");
    let wget = Binary::new("wget", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap();

    let json = serde_json::to_string_pretty(&wget.snapshot()).unwrap();
    let record: BinaryRecord = serde_json::from_str(&json).unwrap();

    assert_eq!(record.abspath.as_deref(), Some(path.as_path()));
    assert_eq!(record.version.map(|v| v.to_string()).as_deref(), Some("1.24.5"));
    assert_eq!(record.sha256, Some(sha256_file(&path).unwrap()));
    assert_eq!(record.provider.as_deref(), Some("fake"));
    assert!(record.is_valid);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["version"], "1.24.5");
    assert_eq!(value["providers"], serde_json::json!(["fake"]));
}

#[test]
fn stored_validity_is_not_recomputed() {
    let dir = FakeBinDir::new();
    let path = dir.add("tool", "tool 1.0.0");
    let record = Binary::new("tool", vec![Arc::new(dir_provider("fake", &dir))]).load().unwrap().snapshot();
    let json = serde_json::to_string(&record).unwrap();

    std::fs::remove_file(&path).unwrap();
    let back: BinaryRecord = serde_json::from_str(&json).unwrap();
    assert!(back.is_valid);
    assert!(!back.loaded().unwrap().is_valid());
}

#[test]
fn catalog_reports_current_state() {
    let dir = FakeBinDir::new();
    dir.add("jq", "jq-1.7.1");
    let provider = Arc::new(dir_provider("fake", &dir));
    let binaries = vec![
        Binary::new("jq", vec![Arc::clone(&provider)]).load().unwrap(),
        Binary::new("missingtool", vec![provider]).with_description("never installed"),
    ];

    let all = get_all_binaries(&binaries);
    assert_eq!(all.len(), 2);
    assert!(all[0].is_valid);
    assert!(!all[1].is_valid);
    assert_eq!(all[1].description, "never installed");

    assert_eq!(get_binary(&binaries, "jq"), Some(all[0].clone()));
    assert!(get_binary(&binaries, "curl").is_none());
}
