//! GTFS-shaped output records.
//!
//! These types are projections only: they carry exactly the fields a
//! feed publishes, and writing them out is left to the caller.

mod calendar;
mod feed;
mod records;

pub use calendar::{CalendarDateRecord, CalendarRecord, SERVICE_REMOVED, ServiceIdIndex, create_calendar};
pub use feed::Feed;
pub use records::{RouteRecord, StopTimeRecord, TripRecord, UNKNOWN_AGENCY};
