//! Calendar and calendar date records.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Calendar, Schedule};

/// Service id assigned to each distinct calendar.
pub type ServiceIdIndex = HashMap<Calendar, u64>;

/// One row of `calendar.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarRecord {
    pub service_id: u64,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    /// YYYYMMDD
    pub start_date: String,
    pub end_date: String,
}

/// One row of `calendar_dates.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDateRecord {
    pub service_id: u64,
    pub date: String,
    /// 1 adds the date, 2 removes it
    pub exception_type: u8,
}

/// GTFS `exception_type` for a date the service does not run.
pub const SERVICE_REMOVED: u8 = 2;

fn gtfs_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

impl CalendarRecord {
    pub fn new(service_id: u64, calendar: &Calendar) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] =
            calendar.days().monday_flags().map(u8::from);
        Self {
            service_id,
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
            start_date: gtfs_date(calendar.runs_from()),
            end_date: gtfs_date(calendar.runs_to()),
        }
    }
}

/// Assign service ids to the calendars of `schedules`.
///
/// Schedules with identical calendars share a service id. Ids start at 1
/// and follow the order calendars are first seen. Every exclude date
/// becomes a removal in `calendar_dates.txt`.
pub fn create_calendar(
    schedules: &[Schedule],
) -> (Vec<CalendarRecord>, Vec<CalendarDateRecord>, ServiceIdIndex) {
    let mut calendars = Vec::new();
    let mut calendar_dates = Vec::new();
    let mut service_ids = ServiceIdIndex::new();

    for schedule in schedules {
        if service_ids.contains_key(&schedule.calendar) {
            continue;
        }
        let service_id = service_ids.len() as u64 + 1;
        calendars.push(CalendarRecord::new(service_id, &schedule.calendar));
        calendar_dates.extend(schedule.calendar.exclude_days().iter().map(|date| {
            CalendarDateRecord {
                service_id,
                date: gtfs_date(*date),
                exception_type: SERVICE_REMOVED,
            }
        }));
        service_ids.insert(schedule.calendar.clone(), service_id);
    }

    (calendars, calendar_dates, service_ids)
}
