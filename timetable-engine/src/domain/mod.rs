//! Domain types for timetable resolution.
//!
//! Value types validate their invariants at construction time, so code
//! that receives them can trust their validity. The timetable model
//! (calendars, schedules, associations and variation events) is built on
//! top of them.

mod association;
mod calendar;
mod error;
mod operator;
mod record;
mod schedule;
mod station;
mod stop_time;
mod time;
mod tuid;
mod variation;

pub use association::{Association, AssociationType, DateIndicator};
pub use calendar::{Calendar, Days, OverlapType};
pub use error::DomainError;
pub use operator::{AtocCode, InvalidAtocCode};
pub use record::{IdGenerator, OverlayRecord, Stp};
pub use schedule::{RouteType, Schedule};
pub use station::{Crs, InvalidCrs};
pub use stop_time::{Activity, StopTime};
pub use time::{SECONDS_PER_DAY, ServiceTime, TimeError};
pub use tuid::{InvalidTuid, Tuid};
pub use variation::{
    CancellationType, TrainCancellation, TrainChangeOfOrigin, TrainEvent, TrainReinstatement,
    VariationEvent,
};
