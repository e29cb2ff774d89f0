//! Trip, route and stop time records.

use serde::Serialize;

use crate::domain::{RouteType, Schedule, ServiceTime, StopTime};

/// Agency used for schedules with no operator.
pub const UNKNOWN_AGENCY: &str = "ZZ";

/// One row of `stop_times.txt`.
///
/// Only the published fields of a [`StopTime`] appear here; the scheduled
/// times and the other matching data stay behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTimeRecord {
    pub trip_id: u64,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
    pub stop_id: String,
    pub stop_sequence: u32,
    /// Platform
    pub stop_headsign: Option<String>,
    pub pickup_type: u8,
    pub drop_off_type: u8,
    pub timepoint: u8,
}

impl StopTimeRecord {
    pub fn from_stop(trip_id: u64, stop: &StopTime) -> Self {
        Self {
            trip_id,
            arrival_time: stop.arrival_time.map(format_time),
            departure_time: stop.departure_time.map(format_time),
            stop_id: stop.stop_id.as_str().to_string(),
            stop_sequence: stop.stop_sequence,
            stop_headsign: stop.platform.clone(),
            pickup_type: stop.pickup_type.gtfs_code(),
            drop_off_type: stop.drop_off_type.gtfs_code(),
            timepoint: u8::from(stop.timepoint),
        }
    }
}

fn format_time(time: ServiceTime) -> String {
    time.to_string()
}

fn mode_name(mode: RouteType) -> &'static str {
    match mode {
        RouteType::Tram => "Tram",
        RouteType::Subway => "Underground",
        RouteType::Rail => "Rail",
        RouteType::Bus => "Bus",
        RouteType::Ferry => "Ferry",
        RouteType::Gondola => "Gondola",
    }
}

/// One row of `trips.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRecord {
    pub route_id: u64,
    pub service_id: u64,
    pub trip_id: u64,
    /// Train UID
    pub trip_headsign: String,
    /// Retail service id
    pub trip_short_name: Option<String>,
    pub direction_id: u8,
    pub wheelchair_accessible: u8,
    pub bikes_allowed: u8,
}

/// One row of `routes.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    pub route_id: u64,
    pub agency_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: u16,
}

impl Schedule {
    /// The published stop times of this schedule.
    pub fn stop_time_records(&self) -> Vec<StopTimeRecord> {
        self.stop_times
            .iter()
            .map(|stop| StopTimeRecord::from_stop(self.id, stop))
            .collect()
    }

    pub fn to_trip(&self, service_id: u64, route_id: u64) -> TripRecord {
        TripRecord {
            route_id,
            service_id,
            trip_id: self.id,
            trip_headsign: self.tuid.as_str().to_string(),
            trip_short_name: self.rsid.clone(),
            direction_id: 0,
            wheelchair_accessible: 1,
            bikes_allowed: 0,
        }
    }

    /// The route this schedule runs on, named after its operator, origin
    /// and destination. Schedules sharing a short name share a route.
    pub fn to_route(&self) -> RouteRecord {
        let agency = self
            .operator
            .as_ref()
            .map_or(UNKNOWN_AGENCY, |op| op.as_str())
            .to_string();
        let origin = self.origin().map_or("", |s| s.stop_id.as_str());
        let destination = self.destination().map_or("", |s| s.stop_id.as_str());

        RouteRecord {
            route_id: self.id,
            route_short_name: format!("{agency}:{origin}->{destination}"),
            route_long_name: format!(
                "{agency} {} service from {origin} to {destination}",
                mode_name(self.mode)
            ),
            agency_id: agency,
            route_type: self.mode.gtfs_code(),
        }
    }
}
