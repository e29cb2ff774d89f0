//! Schedule consolidation.
//!
//! Overlay resolution and association handling leave many schedules that
//! publish the same trip over neighbouring date ranges. Merging their
//! calendars keeps the feed small.

use tracing::debug;

use crate::domain::{Calendar, Schedule};

use super::OverlayIndex;

/// Merge schedules of the same train that publish identical trips on
/// adjoining or overlapping dates.
///
/// Trains come out in the order they were first seen. The merged schedule
/// keeps the lower of the two ids.
pub fn merge_schedules(schedules: Vec<Schedule>) -> Vec<Schedule> {
    let before = schedules.len();
    let mut index = OverlayIndex::new();
    for schedule in schedules {
        let tuid = schedule.tuid.clone();
        index.push(&tuid, schedule);
    }

    let merged: Vec<Schedule> = index
        .into_groups()
        .flat_map(|(_, group)| merge_group(group))
        .collect();

    debug!(before, after = merged.len(), "schedules consolidated");
    merged
}

/// Repeatedly merge the first mergeable pair until none is left.
fn merge_group(mut group: Vec<Schedule>) -> Vec<Schedule> {
    group.sort_by_key(|s| (s.calendar.runs_from(), s.id));

    while let Some((i, j, calendar)) = find_mergeable(&group) {
        let other = group.remove(j);
        let survivor = &mut group[i];
        survivor.calendar = calendar;
        survivor.id = survivor.id.min(other.id);
    }

    group
}

fn find_mergeable(group: &[Schedule]) -> Option<(usize, usize, Calendar)> {
    for (i, a) in group.iter().enumerate() {
        for (j, b) in group.iter().enumerate().skip(i + 1) {
            if !a.has_same_service_as(b) {
                continue;
            }
            if let Some(calendar) = a.calendar.union(&b.calendar) {
                return Some((i, j, calendar));
            }
        }
    }
    None
}
