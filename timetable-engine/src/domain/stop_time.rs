//! Stop time entries of a schedule.

use super::{Crs, ServiceTime};

/// Passenger activity at a stop, using GTFS `pickup_type` /
/// `drop_off_type` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Activity {
    /// Regularly scheduled (0)
    #[default]
    Regular,
    /// Not available (1)
    NotAvailable,
    /// Must phone the agency (2)
    PhoneAgency,
    /// Must coordinate with the driver (3)
    CoordinateWithDriver,
}

impl Activity {
    pub fn gtfs_code(self) -> u8 {
        match self {
            Activity::Regular => 0,
            Activity::NotAvailable => 1,
            Activity::PhoneAgency => 2,
            Activity::CoordinateWithDriver => 3,
        }
    }

    pub fn from_gtfs_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Activity::Regular),
            1 => Some(Activity::NotAvailable),
            2 => Some(Activity::PhoneAgency),
            3 => Some(Activity::CoordinateWithDriver),
            _ => None,
        }
    }
}

/// One call of a schedule at a location.
///
/// `arrival_time`/`departure_time` are the times published for the stop,
/// which for real-time schedules are the recorded actuals. The
/// `scheduled_*` times, `correction_ind_total` and `scheduled_location_id`
/// exist only to match real-time events and never reach the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop_id: Crs,
    /// 1-based position within the schedule
    pub stop_sequence: u32,
    pub arrival_time: Option<ServiceTime>,
    pub departure_time: Option<ServiceTime>,
    pub scheduled_arrival_time: Option<ServiceTime>,
    pub scheduled_departure_time: Option<ServiceTime>,
    /// Platform, published as the stop headsign
    pub platform: Option<String>,
    pub pickup_type: Activity,
    pub drop_off_type: Activity,
    pub timepoint: bool,
    /// Number of real-time correction signals behind the recorded times.
    /// Negative marks a destination that was estimated, not observed.
    pub correction_ind_total: i32,
    /// Timetable row this stop was built from
    pub scheduled_location_id: Option<u64>,
}

impl StopTime {
    /// A regular calling stop with the given published times.
    pub fn new(
        stop_id: Crs,
        stop_sequence: u32,
        arrival_time: Option<ServiceTime>,
        departure_time: Option<ServiceTime>,
    ) -> Self {
        Self {
            stop_id,
            stop_sequence,
            arrival_time,
            departure_time,
            scheduled_arrival_time: None,
            scheduled_departure_time: None,
            platform: None,
            pickup_type: Activity::Regular,
            drop_off_type: Activity::Regular,
            timepoint: true,
            correction_ind_total: 0,
            scheduled_location_id: None,
        }
    }

    /// The time used to match this stop against a real-time event:
    /// scheduled departure, scheduled arrival, actual departure, then
    /// actual arrival.
    pub fn best_time(&self) -> Option<ServiceTime> {
        self.scheduled_departure_time
            .or(self.scheduled_arrival_time)
            .or(self.departure_time)
            .or(self.arrival_time)
    }

    /// Do the two stops publish the same call? Fields used only to match
    /// real-time events are ignored.
    pub fn publishes_same_as(&self, other: &StopTime) -> bool {
        self.stop_id == other.stop_id
            && self.stop_sequence == other.stop_sequence
            && self.arrival_time == other.arrival_time
            && self.departure_time == other.departure_time
            && self.platform == other.platform
            && self.pickup_type == other.pickup_type
            && self.drop_off_type == other.drop_off_type
            && self.timepoint == other.timepoint
    }

    /// Turn this stop into the first stop of a journey: it arrives when it
    /// departs and only picks up.
    pub fn make_origin(&mut self) {
        self.arrival_time = self.departure_time;
        self.pickup_type = Activity::Regular;
        self.drop_off_type = Activity::NotAvailable;
    }

    /// Turn this stop into the last stop of a journey: it departs when it
    /// arrives and only sets down.
    pub fn make_terminus(&mut self) {
        self.departure_time = self.arrival_time;
        self.pickup_type = Activity::NotAvailable;
        self.drop_off_type = Activity::Regular;
    }
}
