use std::fs;

use rule_pipeline::ingestion::{read_records, DataFormat, IoOptions};
use rule_pipeline::output::write_records;
use rule_pipeline::record;
use rule_pipeline::types::Value;
use rule_pipeline::PipelineError;

#[test]
fn csv_sink_uses_header_union_and_empty_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let records = vec![
        record! { "id" => "1", "name" => "Ada" },
        record! { "id" => "2", "score" => 7.5 },
    ];

    let written = write_records(&path, &records, &IoOptions::default()).unwrap();

    assert_eq!(written, 2);
    assert_eq!(fs::read_to_string(&path).unwrap(), "id,name,score\n1,Ada,\n2,,7.5\n");
}

#[test]
fn csv_sink_stringifies_numbers_and_booleans() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let records = vec![record! {
        "total" => 15.0,
        "ratio" => 0.1 + 0.2,
        "ok" => false,
        "gone" => Value::Absent,
    }];

    write_records(&path, &records, &IoOptions::default()).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "total,ratio,ok,gone\n15,0.30000000000000004,false,\n"
    );
}

#[test]
fn json_sink_keeps_types_and_writes_integers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let records = vec![record! {
        "name" => "Ada",
        "count" => 3.0,
        "score" => 98.5,
        "active" => true,
        "note" => Value::Absent,
    }];

    write_records(&path, &records, &IoOptions::default()).unwrap();

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!([
            { "name": "Ada", "count": 3, "score": 98.5, "active": true, "note": null }
        ])
    );
    assert!(written[0]["count"].is_i64());
}

#[test]
fn json_sink_rejects_non_finite_numbers_without_creating_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out.json");
    let records = vec![record! { "x" => f64::NAN }];

    let err = write_records(&path, &records, &IoOptions::default()).unwrap_err();

    assert!(matches!(err, PipelineError::UnsupportedValue { row: 1, .. }));
    assert!(!path.exists());
    assert!(!dir.path().join("nested").exists());
}

#[test]
fn parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/out.csv");

    write_records(&path, &[record! { "x" => "1" }], &IoOptions::default()).unwrap();

    assert!(path.exists());
}

#[test]
fn empty_record_sets_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("empty.json");
    let csv = dir.path().join("empty.csv");

    write_records(&json, &[], &IoOptions::default()).unwrap();
    write_records(&csv, &[], &IoOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(&json).unwrap().trim(), "[]");
    assert!(read_records(&json, &IoOptions::default()).unwrap().is_empty());
    assert_eq!(fs::read_to_string(&csv).unwrap(), "");
}

#[test]
fn written_json_reads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.data");
    let opts = IoOptions {
        format: Some(DataFormat::Json),
        ..Default::default()
    };
    let records = read_records("tests/fixtures/people.json", &IoOptions::default()).unwrap();

    write_records(&path, &records, &opts).unwrap();

    assert_eq!(read_records(&path, &opts).unwrap(), records);
}
