//! Unit tests for variation reconciliation.

use super::*;
use crate::domain::{Activity, Calendar, Crs, Days, Stp, TrainEvent, Tuid};
use chrono::{NaiveDate, NaiveDateTime};

const ACTIVATION: u64 = 7;

fn crs(s: &str) -> Crs {
    Crs::parse(s).unwrap()
}

fn time(s: &str) -> ServiceTime {
    ServiceTime::parse(s).unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("2017-01-02 {s}:00"), "%Y-%m-%d %H:%M:%S").unwrap()
}

fn window() -> Duration {
    Duration::seconds(900)
}

fn stop(location: &str, arrival: &str, departure: &str) -> StopTime {
    StopTime::new(crs(location), 0, Some(time(arrival)), Some(time(departure)))
}

/// A five stop activation running on 2017-01-02.
fn activation() -> Schedule {
    let day = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
    let mut schedule = Schedule::new(
        ACTIVATION,
        Tuid::new("C12345").unwrap(),
        Calendar::new(day, day, Days::ALL, []).unwrap(),
        Stp::Permanent,
        vec![
            stop("ASH", "09:59", "10:00"),
            stop("TON", "10:29", "10:30"),
            stop("SEV", "10:49", "10:50"),
            stop("ORP", "11:09", "11:10"),
            stop("CHX", "11:30", "11:31"),
        ],
    );
    schedule.renumber_stops();
    schedule
}

fn event(id: u64, location: &str, dep: &str, inserted: &str) -> TrainEvent {
    TrainEvent {
        id,
        activation_id: ACTIVATION,
        tuid: Tuid::new("C12345").unwrap(),
        activation_time: at("08:00"),
        station_codes: vec![crs(location)],
        dep_timestamp: at(dep),
        inserted_at: at(inserted),
    }
}

fn cancellation(cancel_type: CancellationType, location: &str, dep: &str, order: i64) -> TrainCancellation {
    TrainCancellation {
        event: event(order as u64, location, dep, dep),
        cancel_type,
        cancel_order: order,
        last_cancellation_id: None,
        scheduled_location_id: None,
    }
}

fn reinstatement(location: &str, dep: &str, inserted: &str) -> TrainReinstatement {
    TrainReinstatement {
        event: event(50, location, dep, inserted),
        reinstatement_order: 1,
        last_reinstatement_id: None,
        scheduled_location_id: None,
    }
}

fn change_of_origin(location: &str, dep: &str, inserted: &str) -> TrainChangeOfOrigin {
    TrainChangeOfOrigin {
        event: event(90, location, dep, inserted),
    }
}

fn run(
    cancellations: Vec<TrainCancellation>,
    reinstatements: Vec<TrainReinstatement>,
    changes: Vec<TrainChangeOfOrigin>,
) -> Vec<Schedule> {
    let events = VariationEvents::new(cancellations, reinstatements, changes);
    apply_variations(vec![activation()], events, window())
}

fn locations(schedule: &Schedule) -> Vec<&str> {
    schedule.stop_times.iter().map(|s| s.stop_id.as_str()).collect()
}

#[test]
fn no_events_leaves_schedule_alone() {
    assert_eq!(run(vec![], vec![], vec![]), vec![activation()]);
}

#[test]
fn change_of_origin_drops_earlier_stops() {
    let result = run(vec![], vec![], vec![change_of_origin("SEV", "10:50", "10:40")]);

    let schedule = &result[0];
    assert_eq!(locations(schedule), vec!["SEV", "ORP", "CHX"]);
    let seqs: Vec<_> = schedule.stop_times.iter().map(|s| s.stop_sequence).collect();
    assert_eq!(seqs, vec![1, 2, 3]);

    let origin = &schedule.stop_times[0];
    assert_eq!(origin.arrival_time, Some(time("10:50")));
    assert_eq!(origin.departure_time, Some(time("10:50")));
    assert_eq!(origin.pickup_type, Activity::Regular);
    assert_eq!(origin.drop_off_type, Activity::NotAvailable);
}

#[test]
fn latest_change_of_origin_wins() {
    let result = run(
        vec![],
        vec![],
        vec![
            change_of_origin("ORP", "11:10", "10:45"),
            change_of_origin("TON", "10:30", "10:20"),
        ],
    );
    assert_eq!(locations(&result[0]), vec!["ORP", "CHX"]);
}

#[test]
fn unmatched_change_of_origin_is_ignored() {
    let result = run(vec![], vec![], vec![change_of_origin("SEV", "13:00", "10:40")]);
    assert_eq!(result, vec![activation()]);
}

#[test]
fn on_call_cancellation_drops_schedule() {
    let result = run(vec![cancellation(CancellationType::OnCall, "ASH", "10:00", 1)], vec![], vec![]);
    assert!(result.is_empty());
}

#[test]
fn at_origin_cancellation_at_first_stop_drops_schedule() {
    let result = run(vec![cancellation(CancellationType::AtOrigin, "ASH", "10:00", 1)], vec![], vec![]);
    assert!(result.is_empty());
}

#[test]
fn en_route_cancellation_makes_new_terminus() {
    let result = run(vec![cancellation(CancellationType::EnRoute, "SEV", "10:50", 1)], vec![], vec![]);

    let schedule = &result[0];
    assert_eq!(locations(schedule), vec!["ASH", "TON", "SEV"]);
    let terminus = &schedule.stop_times[2];
    assert_eq!(terminus.stop_sequence, 3);
    assert_eq!(terminus.arrival_time, Some(time("10:49")));
    assert_eq!(terminus.departure_time, Some(time("10:49")));
    assert_eq!(terminus.pickup_type, Activity::NotAvailable);
    assert_eq!(terminus.drop_off_type, Activity::Regular);
}

#[test]
fn cancellation_is_idempotent() {
    let cancel = || vec![cancellation(CancellationType::EnRoute, "SEV", "10:50", 1)];

    let once = run(cancel(), vec![], vec![]);
    let twice = apply_variations(once.clone(), VariationEvents::new(cancel(), vec![], vec![]), window());

    assert_eq!(once, twice);
}

#[test]
fn cancellation_matches_timetable_row() {
    let mut schedule = activation();
    schedule.stop_times[3].scheduled_location_id = Some(44);
    let mut cancel = cancellation(CancellationType::EnRoute, "XXX", "18:00", 1);
    cancel.scheduled_location_id = Some(44);

    let result = apply_variations(vec![schedule], VariationEvents::new([cancel], [], []), window());

    assert_eq!(locations(&result[0]), vec!["ASH", "TON", "SEV", "ORP"]);
}

#[test]
fn highest_order_cancellation_applies() {
    let result = run(
        vec![
            cancellation(CancellationType::EnRoute, "TON", "10:30", 1),
            cancellation(CancellationType::EnRoute, "ORP", "11:10", 3),
            cancellation(CancellationType::OnCall, "ASH", "10:00", 2),
        ],
        vec![],
        vec![],
    );
    assert_eq!(locations(&result[0]), vec!["ASH", "TON", "SEV", "ORP"]);
}

#[test]
fn first_of_equal_order_cancellations_applies() {
    let result = run(
        vec![
            cancellation(CancellationType::EnRoute, "TON", "10:30", 2),
            cancellation(CancellationType::OnCall, "ASH", "10:00", 2),
        ],
        vec![],
        vec![],
    );
    assert_eq!(locations(&result[0]), vec!["ASH", "TON"]);
}

#[test]
fn unrecognized_cancellation_is_ignored() {
    let kind = CancellationType::Unrecognized("SOMETHING".to_string());
    let result = run(vec![cancellation(kind, "SEV", "10:50", 1)], vec![], vec![]);
    assert_eq!(result, vec![activation()]);
}

#[test]
fn unmatched_cancellation_is_ignored() {
    let result = run(vec![cancellation(CancellationType::EnRoute, "SEV", "14:00", 1)], vec![], vec![]);
    assert_eq!(result, vec![activation()]);
}

#[test]
fn later_reinstatement_undoes_cancellation() {
    let result = run(
        vec![cancellation(CancellationType::EnRoute, "SEV", "10:50", 1)],
        vec![reinstatement("SEV", "10:50", "10:55")],
        vec![],
    );
    assert_eq!(result, vec![activation()]);
}

#[test]
fn earlier_reinstatement_does_not_undo_cancellation() {
    let result = run(
        vec![cancellation(CancellationType::EnRoute, "SEV", "10:50", 1)],
        vec![reinstatement("SEV", "10:50", "10:45")],
        vec![],
    );
    assert_eq!(locations(&result[0]), vec!["ASH", "TON", "SEV"]);
}

#[test]
fn reinstatement_elsewhere_does_not_undo_cancellation() {
    let result = run(
        vec![cancellation(CancellationType::EnRoute, "SEV", "10:50", 1)],
        vec![reinstatement("TON", "10:30", "10:55")],
        vec![],
    );
    assert_eq!(locations(&result[0]), vec!["ASH", "TON", "SEV"]);
}

#[test]
fn change_of_origin_discards_earlier_cancellations() {
    let result = run(
        vec![cancellation(CancellationType::AtOrigin, "ASH", "10:00", 5)],
        vec![],
        vec![change_of_origin("TON", "10:30", "09:30")],
    );
    assert_eq!(locations(&result[0]), vec!["TON", "SEV", "ORP", "CHX"]);
}

#[test]
fn cancellation_after_change_of_origin_still_applies() {
    let result = run(
        vec![cancellation(CancellationType::EnRoute, "ORP", "11:10", 1)],
        vec![],
        vec![change_of_origin("TON", "10:30", "09:30")],
    );
    assert_eq!(locations(&result[0]), vec!["TON", "SEV", "ORP"]);
    assert_eq!(result[0].stop_times[2].stop_sequence, 3);
}

#[test]
fn out_of_plan_moves_estimated_destination() {
    let mut schedule = activation();
    schedule.stop_times[4].correction_ind_total = -1;
    let cancel = cancellation(CancellationType::OutOfPlan, "BKH", "11:20", 1);

    let result = apply_variations(vec![schedule], VariationEvents::new([cancel], [], []), window());

    let last = &result[0].stop_times[4];
    assert_eq!(last.stop_id.as_str(), "BKH");
    assert_eq!(last.arrival_time, Some(time("11:20")));
    assert_eq!(last.departure_time, Some(time("11:20")));
}

#[test]
fn out_of_plan_keeps_observed_destination() {
    let cancel = cancellation(CancellationType::OutOfPlan, "BKH", "11:20", 1);
    let result = run(vec![cancel], vec![], vec![]);
    assert_eq!(result, vec![activation()]);
}

#[test]
fn out_of_plan_outside_last_leg_is_ignored() {
    let mut schedule = activation();
    schedule.stop_times[4].correction_ind_total = -1;
    let cancel = cancellation(CancellationType::OutOfPlan, "BKH", "11:45", 1);

    let result = apply_variations(vec![schedule.clone()], VariationEvents::new([cancel], [], []), window());

    assert_eq!(result, vec![schedule]);
}

#[test]
fn out_of_plan_with_station_match_truncates() {
    let result = run(vec![cancellation(CancellationType::OutOfPlan, "SEV", "10:50", 1)], vec![], vec![]);
    assert_eq!(locations(&result[0]), vec!["ASH", "TON", "SEV"]);
}

#[test]
fn events_for_other_activations_are_ignored() {
    let mut cancel = cancellation(CancellationType::OnCall, "ASH", "10:00", 1);
    cancel.event.activation_id = ACTIVATION + 1;

    let result = apply_variations(vec![activation()], VariationEvents::new([cancel], [], []), window());

    assert_eq!(result, vec![activation()]);
}
