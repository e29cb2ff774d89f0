//! Tests for batch parsing and conversion.

use super::*;
use crate::domain::{Activity, AssociationType, CancellationType, RouteType, Stp};
use crate::resolve::{Engine, EngineConfig};
use std::io::Write;

const BATCH: &str = r#"{
  "schedules": [
    {
      "id": 4,
      "tuid": "C10000",
      "runs_from": "2017-01-15",
      "runs_to": "2017-02-15",
      "days": "1111111",
      "stp": "O",
      "stop_times": [
        {"stop_id": "ASH", "stop_sequence": 1, "departure_time": "10:00:00"},
        {"stop_id": "CHX", "stop_sequence": 2, "arrival_time": "11:00:00", "pickup_type": 1}
      ]
    },
    {
      "id": 1,
      "tuid": "C10000",
      "rsid": "SE100000",
      "runs_from": "2017-01-01",
      "runs_to": "2017-01-31",
      "days": "1111111",
      "exclude_days": ["2017-01-02"],
      "stp": "P",
      "train_category": "BS",
      "operator": "SE",
      "first_class_available": true,
      "stop_times": [
        {"stop_id": "ASH", "stop_sequence": 1, "departure_time": "10:00:00"},
        {"stop_id": "CHX", "stop_sequence": 2, "arrival_time": "11:00:00", "platform": "3"}
      ]
    }
  ],
  "associations": [
    {
      "id": 7,
      "base_tuid": "C10000",
      "assoc_tuid": "C20000",
      "assoc_location": "ASH",
      "date_indicator": "S",
      "assoc_category": "JJ",
      "runs_from": "2017-01-01",
      "runs_to": "2017-01-31",
      "days": "1111100",
      "stp": "P"
    }
  ],
  "cancellations": [
    {
      "id": 20,
      "activation_id": 1,
      "tuid": "C10000",
      "activation_time": "2017-01-03T09:00:00",
      "station_codes": ["ASH"],
      "dep_timestamp": "2017-01-03T10:00:00",
      "inserted_at": "2017-01-03T09:30:00",
      "cancel_type": "ON CALL",
      "cancel_order": 1
    }
  ]
}"#;

#[test]
fn parses_full_batch() {
    let timetable = from_json(BATCH).unwrap();

    assert_eq!(timetable.schedules.len(), 2);
    let permanent = &timetable.schedules[0];
    assert_eq!(permanent.id, 1);
    assert_eq!(permanent.stp, Stp::Permanent);
    assert_eq!(permanent.mode, RouteType::Bus);
    assert_eq!(permanent.operator.map(|op| op.as_str().to_string()).as_deref(), Some("SE"));
    assert_eq!(permanent.rsid.as_deref(), Some("SE100000"));
    assert!(permanent.first_class_available);
    assert!(!permanent.reservation_possible);
    assert_eq!(permanent.calendar.exclude_days().len(), 1);
    assert_eq!(permanent.stop_times[1].platform.as_deref(), Some("3"));
    assert!(permanent.stop_times[1].timepoint);

    let overlay = &timetable.schedules[1];
    assert_eq!(overlay.stp, Stp::Overlay);
    assert_eq!(overlay.mode, RouteType::Rail);
    assert_eq!(overlay.stop_times[1].pickup_type, Activity::NotAvailable);
    assert_eq!(overlay.stop_times[0].arrival_time, None);

    assert_eq!(timetable.associations.len(), 1);
    assert_eq!(timetable.associations[0].assoc_type, AssociationType::Join);

    let cancellations = &timetable.events.cancellations[&1];
    assert_eq!(cancellations[0].cancel_type, CancellationType::OnCall);
    assert!(timetable.events.reinstatements.is_empty());
}

#[test]
fn empty_object_is_an_empty_batch() {
    let timetable = from_json("{}").unwrap();
    assert!(timetable.schedules.is_empty());
    assert!(timetable.associations.is_empty());
    assert!(timetable.events.is_empty());
}

#[test]
fn invalid_json_is_rejected() {
    let err = from_json("{\"schedules\": 3}").unwrap_err();
    assert!(matches!(err, BatchError::Json(_)));
}

#[test]
fn invalid_codes_name_the_record() {
    let bad_stp = BATCH.replace("\"stp\": \"O\"", "\"stp\": \"X\"");
    let err = from_json(&bad_stp).unwrap_err();
    assert_eq!(err.to_string(), "record 4: invalid stp \"X\"");

    let bad_crs = BATCH.replace("\"assoc_location\": \"ASH\"", "\"assoc_location\": \"ash\"");
    assert!(matches!(from_json(&bad_crs).unwrap_err(), BatchError::Crs { id: 7, .. }));

    let bad_range = BATCH.replace("\"runs_to\": \"2017-02-15\"", "\"runs_to\": \"2017-01-01\"");
    assert!(matches!(from_json(&bad_range).unwrap_err(), BatchError::Domain { id: 4, .. }));

    let bad_time = BATCH.replace("\"arrival_time\": \"11:00:00\", \"pickup_type\": 1", "\"arrival_time\": \"11h\"");
    assert!(matches!(from_json(&bad_time).unwrap_err(), BatchError::Time { id: 4, .. }));
}

#[test]
fn loads_batch_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BATCH.as_bytes()).unwrap();

    let timetable = load(file.path()).unwrap();
    assert_eq!(timetable.schedules.len(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, BatchError::Io { .. }));
}

#[test]
fn loaded_batch_resolves() {
    let timetable = from_json(BATCH).unwrap();

    let schedules = Engine::new(EngineConfig::default()).resolve(timetable).unwrap();

    let summary: Vec<_> = schedules
        .iter()
        .map(|s| (s.id, s.calendar.runs_from().to_string(), s.calendar.runs_to().to_string()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "2017-01-01".to_string(), "2017-01-14".to_string()),
            (4, "2017-01-15".to_string(), "2017-02-15".to_string()),
        ]
    );
}
