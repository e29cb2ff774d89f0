//! Whole-feed projection of resolved schedules.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::domain::Schedule;

use super::{CalendarDateRecord, CalendarRecord, RouteRecord, StopTimeRecord, TripRecord, create_calendar};

/// The GTFS tables derived from a set of resolved schedules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Feed {
    pub calendar: Vec<CalendarRecord>,
    pub calendar_dates: Vec<CalendarDateRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
}

impl Feed {
    /// Project `schedules` into feed records.
    ///
    /// Each schedule becomes one trip. Schedules whose routes share a
    /// short name are published under the first such route.
    pub fn from_schedules(schedules: &[Schedule]) -> Self {
        let (calendar, calendar_dates, service_ids) = create_calendar(schedules);
        let mut routes: Vec<RouteRecord> = Vec::new();
        let mut route_ids: HashMap<String, u64> = HashMap::new();
        let mut trips = Vec::with_capacity(schedules.len());
        let mut stop_times = Vec::new();

        for schedule in schedules {
            let Some(&service_id) = service_ids.get(&schedule.calendar) else {
                continue;
            };
            let route = schedule.to_route();
            let route_id = *route_ids
                .entry(route.route_short_name.clone())
                .or_insert_with(|| {
                    let id = route.route_id;
                    routes.push(route);
                    id
                });

            trips.push(schedule.to_trip(service_id, route_id));
            stop_times.extend(schedule.stop_time_records());
        }

        info!(
            trips = trips.len(),
            routes = routes.len(),
            services = calendar.len(),
            "feed projected"
        );

        Self {
            calendar,
            calendar_dates,
            routes,
            trips,
            stop_times,
        }
    }
}
