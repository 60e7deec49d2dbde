use std::io::Write;

use crate::externs::load_externs_map;

#[test]
fn missing_path_is_empty_map() {
    let map = load_externs_map(None).expect("no path is fine");
    assert!(map.is_empty());
}

#[test]
fn absent_file_is_empty_map() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.json");
    let map = load_externs_map(Some(&path)).expect("absent file is fine");
    assert!(map.is_empty());
}

#[test]
fn loads_name_pairs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("externs.json");
    let mut file = std::fs::File::create(&path).expect("create");
    write!(file, "{{\"MyExternType\": \"MyTsType\"}}").expect("write");

    let map = load_externs_map(Some(&path)).expect("valid json");
    assert_eq!(map.get("MyExternType").map(String::as_str), Some("MyTsType"));
}

#[test]
fn malformed_json_is_a_diagnostic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("externs.json");
    std::fs::write(&path, "not json").expect("write");

    let err = load_externs_map(Some(&path)).expect_err("malformed json must fail");
    assert!(err.message_text.contains("malformed externs map"));
}
