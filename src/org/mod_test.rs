use super::*;
use std::fs;

fn sample_chart() -> OrgChart {
    OrgChart::build([
        ("alice", "bob"),
        ("Bob", "charlie"),
        ("Charlie", "david"),
        ("DAVID", "eve"),
    ])
    .unwrap()
}

#[test]
fn lookup_any_case() {
    let chart = sample_chart();
    assert_eq!(chart.lookup("alice"), Some("bob"));
    assert_eq!(chart.lookup("ALICE"), Some("bob"));
    assert_eq!(chart.lookup("Alice"), Some("bob"));
    assert_eq!(chart.lookup("david"), Some("eve"));
}

#[test]
fn lookup_preserves_manager_case() {
    let chart = sample_chart();
    assert_eq!(chart.lookup("bob"), Some("charlie"));
    assert_eq!(chart.lookup("BOB"), Some("charlie"));
}

#[test]
fn lookup_missing() {
    let chart = sample_chart();
    assert_eq!(chart.lookup("nonexistent"), None);
    assert!(!chart.contains("nonexistent"));
}

#[test]
fn contains_any_case() {
    let chart = sample_chart();
    assert!(chart.contains("alice"));
    assert!(chart.contains("ALICE"));
    assert!(chart.contains("bOb"));
    assert!(chart.contains("david"));
}

#[test]
fn duplicate_identity_rejected() {
    let err = OrgChart::build([("alice", "bob"), ("Alice", "carol")])
        .err()
        .expect("case variants must collide");
    match err {
        MeasureError::DuplicateIdentity(name) => assert_eq!(name, "Alice"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn entries_in_construction_order() {
    let chart = sample_chart();
    let users: Vec<&str> = chart.entries().map(|(u, _)| u).collect();
    assert_eq!(users, vec!["alice", "Bob", "Charlie", "DAVID"]);
    assert_eq!(chart.len(), 4);
}

#[test]
fn load_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("org-data.json");
    fs::write(
        &path,
        r#"{
            "alice": {"manager": "bob", "team": "platform"},
            "bob": {"manager": "carol"}
        }"#,
    )
    .unwrap();

    let chart = OrgChart::load(&path).unwrap();
    assert_eq!(chart.len(), 2);
    assert_eq!(chart.lookup("Alice"), Some("bob"));
    assert_eq!(chart.lookup("bob"), Some("carol"));
}

#[test]
fn load_json_case_collision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("org-data.json");
    fs::write(
        &path,
        r#"{"alice": {"manager": "bob"}, "ALICE": {"manager": "bob"}}"#,
    )
    .unwrap();

    let err = OrgChart::load(&path).err().unwrap();
    assert!(matches!(err, MeasureError::DuplicateIdentity(_)));
}

#[test]
fn load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("org-data.toml");
    fs::write(
        &path,
        "[alice]\nmanager = \"bob\"\n\n[bob]\nmanager = \"carol\"\n",
    )
    .unwrap();

    let chart = OrgChart::load(&path).unwrap();
    assert_eq!(chart.lookup("ALICE"), Some("bob"));
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = OrgChart::load(&dir.path().join("org-data.json"))
        .err()
        .unwrap();
    assert!(matches!(err, MeasureError::OrgDataMissing(_)));
    assert!(err.to_string().contains("cannot be measured"));
}

#[test]
fn load_empty_file_counts_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in [("org-data.json", "{}"), ("org-data.toml", "")] {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        let err = OrgChart::load(&path).err().unwrap();
        assert!(matches!(err, MeasureError::OrgDataMissing(_)), "{name}");
    }
}

#[test]
fn load_record_without_manager() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("org-data.json");
    fs::write(&path, r#"{"alice": {"team": "platform"}}"#).unwrap();

    let err = OrgChart::load(&path).err().unwrap();
    match err {
        MeasureError::OrgData { reason, .. } => assert!(reason.contains("manager")),
        other => panic!("unexpected error: {other}"),
    }
}
