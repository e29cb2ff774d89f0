//! Batch file DTOs.
//!
//! These types map directly onto the JSON batch file. Codes, dates and
//! times stay as strings here and are validated during conversion.

use serde::Deserialize;

/// One closed batch of timetable data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchFile {
    pub schedules: Vec<ScheduleRow>,
    pub associations: Vec<AssociationRow>,
    pub cancellations: Vec<CancellationRow>,
    pub reinstatements: Vec<ReinstatementRow>,
    pub changes_of_origin: Vec<ChangeOfOriginRow>,
}

/// Calendar columns shared by schedules and associations.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarRow {
    /// Date in YYYY-MM-DD format
    pub runs_from: String,
    pub runs_to: String,

    /// Day mask, Monday first (e.g. "1111100")
    pub days: String,

    #[serde(default)]
    pub exclude_days: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRow {
    pub id: u64,
    pub tuid: String,
    pub rsid: Option<String>,

    #[serde(flatten)]
    pub calendar: CalendarRow,

    /// STP indicator ("P", "O" or "C")
    pub stp: String,

    /// CIF train category (e.g. "BS" for bus), decides the route type
    #[serde(default)]
    pub train_category: String,

    /// ATOC code of the operator
    pub operator: Option<String>,

    #[serde(default)]
    pub first_class_available: bool,

    #[serde(default)]
    pub reservation_possible: bool,

    #[serde(default)]
    pub stop_times: Vec<StopTimeRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopTimeRow {
    pub stop_id: String,
    pub stop_sequence: u32,

    /// HH:MM:SS, may be 24:00:00 or later
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    pub scheduled_arrival_time: Option<String>,
    pub scheduled_departure_time: Option<String>,

    pub platform: Option<String>,

    /// GTFS pickup code, 0 if absent
    #[serde(default)]
    pub pickup_type: u8,

    #[serde(default)]
    pub drop_off_type: u8,

    #[serde(default = "default_timepoint")]
    pub timepoint: bool,

    #[serde(default)]
    pub correction_ind_total: i32,

    pub scheduled_location_id: Option<u64>,
}

fn default_timepoint() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssociationRow {
    pub id: u64,
    pub base_tuid: String,
    pub assoc_tuid: String,
    pub assoc_location: String,

    /// "S", "N" or "P"
    pub date_indicator: String,

    /// CIF category ("VV" split, "JJ" join)
    pub assoc_category: String,

    #[serde(flatten)]
    pub calendar: CalendarRow,

    pub stp: String,
}

/// Fields common to every variation event row.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRow {
    pub id: u64,
    pub activation_id: u64,
    pub tuid: String,

    /// ISO 8601 datetime without offset (e.g. "2017-01-02T10:00:00")
    pub activation_time: String,
    pub station_codes: Vec<String>,
    pub dep_timestamp: String,
    pub inserted_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancellationRow {
    #[serde(flatten)]
    pub event: EventRow,

    /// TRUST cancellation type (e.g. "EN ROUTE")
    pub cancel_type: String,
    pub cancel_order: i64,
    pub last_cancellation_id: Option<u64>,
    pub scheduled_location_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReinstatementRow {
    #[serde(flatten)]
    pub event: EventRow,

    pub reinstatement_order: i64,
    pub last_reinstatement_id: Option<u64>,
    pub scheduled_location_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeOfOriginRow {
    #[serde(flatten)]
    pub event: EventRow,
}
