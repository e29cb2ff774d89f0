//! Real-time variation events reported against a train activation.

use chrono::{Duration, NaiveDateTime};

use super::{Crs, StopTime, Tuid};

/// Fields shared by every kind of variation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainEvent {
    pub id: u64,
    /// The activation (one day's running of a train) the event applies to
    pub activation_id: u64,
    pub tuid: Tuid,
    pub activation_time: NaiveDateTime,
    /// Every location code the reporting point maps to
    pub station_codes: Vec<Crs>,
    /// Scheduled departure from the reporting point
    pub dep_timestamp: NaiveDateTime,
    pub inserted_at: NaiveDateTime,
}

impl TrainEvent {
    /// Does `stop` call at one of the event's locations within `window` of
    /// the event's departure timestamp?
    ///
    /// The stop's time is read as a wall-clock time on the timestamp's own
    /// date, so a stop at 24:05:00 matches an event at 00:05 the next
    /// morning.
    pub fn matches_stop(&self, stop: &StopTime, window: Duration) -> bool {
        if !self.station_codes.contains(&stop.stop_id) {
            return false;
        }
        let Some(time) = stop.best_time() else {
            return false;
        };
        let offset = time
            .on(self.dep_timestamp.date())
            .signed_duration_since(self.dep_timestamp);
        offset < window && -offset < window
    }

    /// Do the two events report at any common location?
    pub fn shares_station_with(&self, other: &TrainEvent) -> bool {
        self.station_codes
            .iter()
            .any(|c| other.station_codes.contains(c))
    }
}

/// Where in the journey a cancellation takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CancellationType {
    /// The whole activation was cancelled
    OnCall,
    AtOrigin,
    EnRoute,
    /// The train ran off its planned route
    OutOfPlan,
    Unrecognized(String),
}

impl CancellationType {
    /// Parse a TRUST cancellation type such as "EN ROUTE".
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "ON CALL" => CancellationType::OnCall,
            "AT ORIGIN" => CancellationType::AtOrigin,
            "EN ROUTE" => CancellationType::EnRoute,
            "OUT OF PLAN" => CancellationType::OutOfPlan,
            other => CancellationType::Unrecognized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainCancellation {
    pub event: TrainEvent,
    pub cancel_type: CancellationType,
    /// Position in the activation's stream of cancellations; higher is
    /// more recent
    pub cancel_order: i64,
    pub last_cancellation_id: Option<u64>,
    pub scheduled_location_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainReinstatement {
    pub event: TrainEvent,
    pub reinstatement_order: i64,
    pub last_reinstatement_id: Option<u64>,
    pub scheduled_location_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainChangeOfOrigin {
    pub event: TrainEvent,
}

/// Common view over the three event kinds.
pub trait VariationEvent {
    fn event(&self) -> &TrainEvent;

    /// Timetable row the event was reported against, if known.
    fn scheduled_location_id(&self) -> Option<u64> {
        None
    }

    fn activation_id(&self) -> u64 {
        self.event().activation_id
    }

    /// Does this event refer to the same place as `other`?
    ///
    /// Either both carry the same timetable row, or their location code
    /// sets intersect.
    fn same_location_as(&self, other: &dyn VariationEvent) -> bool {
        let same_row = matches!(
            (self.scheduled_location_id(), other.scheduled_location_id()),
            (Some(a), Some(b)) if a == b
        );
        same_row || self.event().shares_station_with(other.event())
    }
}

impl VariationEvent for TrainCancellation {
    fn event(&self) -> &TrainEvent {
        &self.event
    }

    fn scheduled_location_id(&self) -> Option<u64> {
        self.scheduled_location_id
    }
}

impl VariationEvent for TrainReinstatement {
    fn event(&self) -> &TrainEvent {
        &self.event
    }

    fn scheduled_location_id(&self) -> Option<u64> {
        self.scheduled_location_id
    }
}

impl VariationEvent for TrainChangeOfOrigin {
    fn event(&self) -> &TrainEvent {
        &self.event
    }
}
