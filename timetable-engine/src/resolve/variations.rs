//! Reconciling real-time variation events with schedules.
//!
//! Each schedule handled here is one activation of a train, keyed by its
//! activation id. Cancellations, reinstatements and changes of origin
//! reported against that activation are first played off against each
//! other, and what survives is then applied to the stopping pattern.

use std::collections::HashMap;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::{
    CancellationType, Schedule, ServiceTime, StopTime, TrainCancellation, TrainChangeOfOrigin,
    TrainReinstatement, VariationEvent,
};

/// Variation events for one run, grouped by activation id.
#[derive(Debug, Clone, Default)]
pub struct VariationEvents {
    pub cancellations: HashMap<u64, Vec<TrainCancellation>>,
    pub reinstatements: HashMap<u64, Vec<TrainReinstatement>>,
    pub changes_of_origin: HashMap<u64, Vec<TrainChangeOfOrigin>>,
}

impl VariationEvents {
    pub fn new(
        cancellations: impl IntoIterator<Item = TrainCancellation>,
        reinstatements: impl IntoIterator<Item = TrainReinstatement>,
        changes_of_origin: impl IntoIterator<Item = TrainChangeOfOrigin>,
    ) -> Self {
        Self {
            cancellations: by_activation(cancellations),
            reinstatements: by_activation(reinstatements),
            changes_of_origin: by_activation(changes_of_origin),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cancellations.is_empty()
            && self.reinstatements.is_empty()
            && self.changes_of_origin.is_empty()
    }
}

fn by_activation<E: VariationEvent>(events: impl IntoIterator<Item = E>) -> HashMap<u64, Vec<E>> {
    let mut map: HashMap<u64, Vec<E>> = HashMap::new();
    for event in events {
        map.entry(event.activation_id()).or_default().push(event);
    }
    map
}

/// Apply the variation events to `schedules`.
///
/// Schedules whose activation was cancelled outright are dropped; the
/// rest come back in their original order, possibly with a later origin
/// or an earlier terminus. Events that match no stop are logged and
/// otherwise ignored.
pub fn apply_variations(
    schedules: Vec<Schedule>,
    mut events: VariationEvents,
    window: Duration,
) -> Vec<Schedule> {
    let origins = latest_changes_of_origin(&mut events);
    remove_reinstated_cancellations(&mut events);

    let before = schedules.len();
    let result: Vec<Schedule> = schedules
        .into_iter()
        .filter_map(|mut schedule| {
            if let Some(change) = origins.get(&schedule.id) {
                apply_change_of_origin(&mut schedule, change, window);
            }
            match events.cancellations.get(&schedule.id).and_then(|c| latest_cancellation(c)) {
                Some(cancellation) => apply_cancellation(schedule, cancellation, window),
                None => Some(schedule),
            }
        })
        .collect();

    info!(
        schedules = result.len(),
        dropped = before - result.len(),
        "variations applied"
    );
    result
}

/// Pick the latest change of origin for each activation, and discard the
/// cancellations and reinstatements reported at or before it.
fn latest_changes_of_origin(events: &mut VariationEvents) -> HashMap<u64, TrainChangeOfOrigin> {
    let mut latest = HashMap::new();

    for (activation_id, changes) in events.changes_of_origin.drain() {
        let Some(change) = changes
            .into_iter()
            .reduce(|a, b| if b.event.inserted_at >= a.event.inserted_at { b } else { a })
        else {
            continue;
        };

        let origin_time = change.event.dep_timestamp;
        retain_for(&mut events.cancellations, activation_id, |c| {
            c.event.dep_timestamp > origin_time
        });
        retain_for(&mut events.reinstatements, activation_id, |r| {
            r.event.dep_timestamp > origin_time
        });

        latest.insert(activation_id, change);
    }

    latest
}

/// Drop each cancellation undone by a reinstatement at the same place
/// recorded no earlier than it.
fn remove_reinstated_cancellations(events: &mut VariationEvents) {
    for (activation_id, reinstatements) in &events.reinstatements {
        retain_for(&mut events.cancellations, *activation_id, |c| {
            !reinstatements
                .iter()
                .any(|r| r.same_location_as(c) && c.event.inserted_at <= r.event.inserted_at)
        });
    }
}

/// Keep the events for `activation_id` that satisfy `keep`, removing the
/// key altogether when none are left.
fn retain_for<E>(map: &mut HashMap<u64, Vec<E>>, activation_id: u64, keep: impl FnMut(&E) -> bool) {
    if let Some(events) = map.get_mut(&activation_id) {
        events.retain(keep);
        if events.is_empty() {
            map.remove(&activation_id);
        }
    }
}

/// The cancellation with the highest order; the first of equals wins.
fn latest_cancellation(cancellations: &[TrainCancellation]) -> Option<&TrainCancellation> {
    cancellations.iter().fold(None, |best, c| match best {
        Some(b) if b.cancel_order >= c.cancel_order => Some(b),
        _ => Some(c),
    })
}

/// Start the schedule at the changed origin, dropping the stops before it.
fn apply_change_of_origin(schedule: &mut Schedule, change: &TrainChangeOfOrigin, window: Duration) {
    let Some(index) = schedule
        .stop_times
        .iter()
        .position(|stop| change.event.matches_stop(stop, window))
    else {
        warn!(
            event_id = change.event.id,
            activation_id = change.event.activation_id,
            "cannot find change of origin station"
        );
        return;
    };

    schedule.stop_times.drain(..index);
    schedule.stop_times[0].make_origin();
    schedule.renumber_stops();
}

fn is_cancellation_stop(cancellation: &TrainCancellation, stop: &StopTime, window: Duration) -> bool {
    let same_row = matches!(
        (cancellation.scheduled_location_id, stop.scheduled_location_id),
        (Some(a), Some(b)) if a == b
    );
    same_row || cancellation.event.matches_stop(stop, window)
}

/// Apply `cancellation` to the schedule. Returns `None` when nothing of
/// the schedule ran.
fn apply_cancellation(
    mut schedule: Schedule,
    cancellation: &TrainCancellation,
    window: Duration,
) -> Option<Schedule> {
    let event = &cancellation.event;

    match &cancellation.cancel_type {
        CancellationType::OnCall => {
            debug!(activation_id = event.activation_id, "activation cancelled");
            return None;
        }
        CancellationType::AtOrigin | CancellationType::EnRoute | CancellationType::OutOfPlan => {}
        CancellationType::Unrecognized(kind) => {
            warn!(
                event_id = event.id,
                activation_id = event.activation_id,
                kind = %kind,
                "unrecognized cancellation type"
            );
            return Some(schedule);
        }
    }

    let index = schedule
        .stop_times
        .iter()
        .position(|stop| is_cancellation_stop(cancellation, stop, window));

    match index {
        Some(0) => {
            debug!(activation_id = event.activation_id, "activation cancelled at origin");
            None
        }
        Some(index) => {
            schedule.stop_times.truncate(index + 1);
            schedule.stop_times[index].make_terminus();
            schedule.renumber_stops();
            Some(schedule)
        }
        None => {
            let estimated = cancellation.cancel_type == CancellationType::OutOfPlan
                && correct_estimated_destination(&mut schedule, cancellation);
            if !estimated {
                warn!(
                    event_id = event.id,
                    activation_id = event.activation_id,
                    "cannot find cancellation station"
                );
            }
            Some(schedule)
        }
    }
}

/// Out-of-plan fallback: when the recorded destination was only estimated
/// and the train was cancelled somewhere between its last two stops, put
/// the destination where and when the cancellation happened.
///
/// Stop times are read relative to the activation date. Returns whether
/// the destination was changed.
fn correct_estimated_destination(schedule: &mut Schedule, cancellation: &TrainCancellation) -> bool {
    let event = &cancellation.event;
    let n = schedule.stop_times.len();
    if n < 2 || schedule.stop_times[n - 1].correction_ind_total >= 0 {
        return false;
    }

    let service_day = event.activation_time.date();
    let previous = &schedule.stop_times[n - 2];
    let last = &schedule.stop_times[n - 1];
    let (Some(left), Some(arrived)) = (
        previous.departure_time.or(previous.arrival_time),
        last.arrival_time.or(last.departure_time),
    ) else {
        return false;
    };

    let cancelled_at = event.dep_timestamp;
    if cancelled_at < left.on_service_day(service_day) || cancelled_at > arrived.on_service_day(service_day) {
        return false;
    }
    let (Some(&station), Some(time)) = (
        event.station_codes.first(),
        ServiceTime::since_service_day(cancelled_at, service_day),
    ) else {
        return false;
    };

    let last = &mut schedule.stop_times[n - 1];
    last.stop_id = station;
    last.arrival_time = Some(time);
    last.departure_time = Some(time);
    debug!(
        activation_id = event.activation_id,
        station = %station,
        "estimated destination corrected"
    );
    true
}

#[cfg(test)]
#[path = "variations_tests.rs"]
mod tests;
