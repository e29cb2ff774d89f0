//! Conversion from batch DTOs to domain types.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::domain::{
    Activity, Association, AssociationType, AtocCode, Calendar, CancellationType, Crs,
    DateIndicator, Days, RouteType, Schedule, ServiceTime, StopTime, Stp, TrainCancellation,
    TrainChangeOfOrigin, TrainEvent, TrainReinstatement, Tuid,
};
use crate::resolve::{Timetable, VariationEvents};

use super::error::BatchError;
use super::types::{
    AssociationRow, BatchFile, CalendarRow, CancellationRow, ChangeOfOriginRow, EventRow,
    ReinstatementRow, ScheduleRow, StopTimeRow,
};

/// Convert a parsed batch into a timetable ready to resolve.
///
/// Schedules and associations are stably sorted by STP precedence, so
/// permanent records come first and revisions keep their file order.
pub fn convert_batch(file: BatchFile) -> Result<Timetable, BatchError> {
    let mut schedules = file
        .schedules
        .into_iter()
        .map(convert_schedule)
        .collect::<Result<Vec<_>, _>>()?;
    schedules.sort_by_key(|s| s.stp);

    let mut associations = file
        .associations
        .into_iter()
        .map(convert_association)
        .collect::<Result<Vec<_>, _>>()?;
    associations.sort_by_key(|a| a.stp);

    let events = VariationEvents::new(
        file.cancellations
            .into_iter()
            .map(convert_cancellation)
            .collect::<Result<Vec<_>, _>>()?,
        file.reinstatements
            .into_iter()
            .map(convert_reinstatement)
            .collect::<Result<Vec<_>, _>>()?,
        file.changes_of_origin
            .into_iter()
            .map(convert_change_of_origin)
            .collect::<Result<Vec<_>, _>>()?,
    );

    debug!(
        schedules = schedules.len(),
        associations = associations.len(),
        "batch converted"
    );

    Ok(Timetable {
        schedules,
        associations,
        events,
    })
}

fn invalid(id: u64, field: &'static str, value: &str) -> BatchError {
    BatchError::InvalidValue {
        id,
        field,
        value: value.to_string(),
    }
}

fn crs(id: u64, code: &str) -> Result<Crs, BatchError> {
    Crs::parse(code).map_err(|source| BatchError::Crs { id, source })
}

fn tuid(id: u64, value: &str) -> Result<Tuid, BatchError> {
    Tuid::new(value).map_err(|source| BatchError::Tuid { id, source })
}

fn stp(id: u64, code: &str) -> Result<Stp, BatchError> {
    Stp::from_code(code).ok_or_else(|| invalid(id, "stp", code))
}

fn date(id: u64, value: &str) -> Result<NaiveDate, BatchError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid(id, "date", value))
}

fn datetime(id: u64, value: &str) -> Result<NaiveDateTime, BatchError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| invalid(id, "datetime", value))
}

fn time(id: u64, value: Option<&str>) -> Result<Option<ServiceTime>, BatchError> {
    value
        .map(|v| ServiceTime::parse(v).map_err(|source| BatchError::Time { id, source }))
        .transpose()
}

fn activity(id: u64, code: u8) -> Result<Activity, BatchError> {
    Activity::from_gtfs_code(code).ok_or_else(|| invalid(id, "activity", &code.to_string()))
}

fn convert_calendar(id: u64, row: &CalendarRow) -> Result<Calendar, BatchError> {
    let days = Days::parse(&row.days).ok_or_else(|| invalid(id, "days", &row.days))?;
    let exclude_days = row
        .exclude_days
        .iter()
        .map(|d| date(id, d))
        .collect::<Result<Vec<_>, _>>()?;

    Calendar::new(date(id, &row.runs_from)?, date(id, &row.runs_to)?, days, exclude_days)
        .map_err(|source| BatchError::Domain { id, source })
}

fn convert_schedule(row: ScheduleRow) -> Result<Schedule, BatchError> {
    let id = row.id;
    let stop_times = row
        .stop_times
        .iter()
        .map(|stop| convert_stop_time(id, stop))
        .collect::<Result<Vec<_>, _>>()?;
    let operator = row
        .operator
        .as_deref()
        .map(|op| AtocCode::parse(op).map_err(|source| BatchError::Operator { id, source }))
        .transpose()?;

    let mut schedule = Schedule::new(
        id,
        tuid(id, &row.tuid)?,
        convert_calendar(id, &row.calendar)?,
        stp(id, &row.stp)?,
        stop_times,
    );
    schedule.rsid = row.rsid;
    schedule.mode = RouteType::from_train_category(&row.train_category);
    schedule.operator = operator;
    schedule.first_class_available = row.first_class_available;
    schedule.reservation_possible = row.reservation_possible;
    Ok(schedule)
}

fn convert_stop_time(id: u64, row: &StopTimeRow) -> Result<StopTime, BatchError> {
    Ok(StopTime {
        stop_id: crs(id, &row.stop_id)?,
        stop_sequence: row.stop_sequence,
        arrival_time: time(id, row.arrival_time.as_deref())?,
        departure_time: time(id, row.departure_time.as_deref())?,
        scheduled_arrival_time: time(id, row.scheduled_arrival_time.as_deref())?,
        scheduled_departure_time: time(id, row.scheduled_departure_time.as_deref())?,
        platform: row.platform.clone(),
        pickup_type: activity(id, row.pickup_type)?,
        drop_off_type: activity(id, row.drop_off_type)?,
        timepoint: row.timepoint,
        correction_ind_total: row.correction_ind_total,
        scheduled_location_id: row.scheduled_location_id,
    })
}

fn convert_association(row: AssociationRow) -> Result<Association, BatchError> {
    let id = row.id;
    let date_indicator = DateIndicator::from_code(&row.date_indicator)
        .ok_or_else(|| invalid(id, "date indicator", &row.date_indicator))?;

    Ok(Association::new(
        id,
        tuid(id, &row.base_tuid)?,
        tuid(id, &row.assoc_tuid)?,
        crs(id, &row.assoc_location)?,
        date_indicator,
        AssociationType::from_code(&row.assoc_category),
        convert_calendar(id, &row.calendar)?,
        stp(id, &row.stp)?,
    ))
}

fn convert_event(row: EventRow) -> Result<TrainEvent, BatchError> {
    let id = row.id;
    Ok(TrainEvent {
        id,
        activation_id: row.activation_id,
        tuid: tuid(id, &row.tuid)?,
        activation_time: datetime(id, &row.activation_time)?,
        station_codes: row
            .station_codes
            .iter()
            .map(|code| crs(id, code))
            .collect::<Result<_, _>>()?,
        dep_timestamp: datetime(id, &row.dep_timestamp)?,
        inserted_at: datetime(id, &row.inserted_at)?,
    })
}

fn convert_cancellation(row: CancellationRow) -> Result<TrainCancellation, BatchError> {
    Ok(TrainCancellation {
        event: convert_event(row.event)?,
        cancel_type: CancellationType::from_code(&row.cancel_type),
        cancel_order: row.cancel_order,
        last_cancellation_id: row.last_cancellation_id,
        scheduled_location_id: row.scheduled_location_id,
    })
}

fn convert_reinstatement(row: ReinstatementRow) -> Result<TrainReinstatement, BatchError> {
    Ok(TrainReinstatement {
        event: convert_event(row.event)?,
        reinstatement_order: row.reinstatement_order,
        last_reinstatement_id: row.last_reinstatement_id,
        scheduled_location_id: row.scheduled_location_id,
    })
}

fn convert_change_of_origin(row: ChangeOfOriginRow) -> Result<TrainChangeOfOrigin, BatchError> {
    Ok(TrainChangeOfOrigin {
        event: convert_event(row.event)?,
    })
}
