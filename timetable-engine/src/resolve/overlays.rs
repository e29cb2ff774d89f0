//! Overlay resolution.
//!
//! Lays overlay and cancellation revisions over the records they replace,
//! so that for every train identifier the surviving records never run on
//! the same date.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{DomainError, IdGenerator, OverlapType, OverlayRecord, Stp, Tuid};

/// Records grouped by train identifier, in the order each identifier was
/// first seen.
#[derive(Debug, Clone)]
pub struct OverlayIndex<R> {
    groups: Vec<(Tuid, Vec<R>)>,
    positions: HashMap<Tuid, usize>,
}

impl<R> Default for OverlayIndex<R> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<R> OverlayIndex<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The records for `tuid`; empty if there are none.
    pub fn get(&self, tuid: &Tuid) -> &[R] {
        self.positions
            .get(tuid)
            .map(|&i| self.groups[i].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, tuid: &Tuid) -> bool {
        self.positions.contains_key(tuid)
    }

    fn group_mut(&mut self, tuid: &Tuid) -> &mut Vec<R> {
        let i = match self.positions.get(tuid) {
            Some(&i) => i,
            None => {
                self.groups.push((tuid.clone(), Vec::new()));
                self.positions.insert(tuid.clone(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[i].1
    }

    /// Append a record under `tuid`.
    pub fn push(&mut self, tuid: &Tuid, record: R) {
        self.group_mut(tuid).push(record);
    }

    /// Take every record for `tuid` out of the index. The identifier keeps
    /// its position, so records put back with [`OverlayIndex::replace`]
    /// come out where they were.
    pub fn take(&mut self, tuid: &Tuid) -> Vec<R> {
        match self.positions.get(tuid) {
            Some(&i) => std::mem::take(&mut self.groups[i].1),
            None => Vec::new(),
        }
    }

    /// Replace every record for `tuid`.
    pub fn replace(&mut self, tuid: &Tuid, records: Vec<R>) {
        *self.group_mut(tuid) = records;
    }

    /// Number of records across all identifiers.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers and their records, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tuid, &[R])> {
        self.groups.iter().map(|(tuid, records)| (tuid, records.as_slice()))
    }

    /// Consume the index, yielding each identifier with its records.
    pub fn into_groups(self) -> impl Iterator<Item = (Tuid, Vec<R>)> {
        self.groups.into_iter()
    }

    /// Every record, grouped by identifier in first-seen order.
    pub fn into_records(self) -> Vec<R> {
        self.into_groups().flat_map(|(_, records)| records).collect()
    }
}

/// Index `records` by identifier, applying each overlay and cancellation
/// to the records already indexed under the same identifier.
///
/// Records are processed in the order given, so callers pass them sorted
/// by STP precedence (permanent first). Each non-permanent record is laid
/// over the current state of its group, including cuts made by earlier
/// overlays. Cancellations only remove dates and are never indexed
/// themselves.
pub fn apply_overlays<R>(
    records: impl IntoIterator<Item = R>,
    ids: &mut IdGenerator,
) -> Result<OverlayIndex<R>, DomainError>
where
    R: OverlayRecord,
{
    let mut index = OverlayIndex::new();

    for record in records {
        let tuid = record.tuid().clone();

        if record.stp() != Stp::Permanent && index.contains(&tuid) {
            let existing = index.take(&tuid);
            let mut replaced = Vec::with_capacity(existing.len() + 1);
            for base in existing {
                replaced.extend(apply_overlay(base, &record, ids)?);
            }
            index.replace(&tuid, replaced);
        }

        if record.stp() != Stp::Cancellation {
            index.push(&tuid, record);
        }
    }

    debug!(records = index.len(), "overlays applied");
    Ok(index)
}

/// What is left of `base` once `overlay` is laid over it.
///
/// A short overlap removes the overlay's dates from the base record and
/// keeps its id. A full overlap splits the base record either side of the
/// overlay; the first piece keeps the original id and any other piece
/// gets a fresh one.
fn apply_overlay<R>(base: R, overlay: &R, ids: &mut IdGenerator) -> Result<Vec<R>, DomainError>
where
    R: OverlayRecord,
{
    match base.calendar().get_overlap(overlay.calendar()) {
        OverlapType::None => Ok(vec![base]),
        OverlapType::Short => Ok(base
            .calendar()
            .add_exclude_days(overlay.calendar())
            .into_iter()
            .map(|calendar| base.clone_with(calendar, base.id()))
            .collect()),
        OverlapType::Full => {
            let mut pieces = Vec::with_capacity(2);
            for (i, calendar) in base.calendar().divide_around(overlay.calendar()).into_iter().enumerate() {
                let id = if i == 0 { base.id() } else { ids.next_id()? };
                pieces.push(base.clone_with(calendar, id));
            }
            Ok(pieces)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Calendar, Days, Schedule};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn record(id: u64, start: i64, len: i64, stp: Stp) -> Schedule {
        let epoch = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let from = epoch + Duration::days(start);
        Schedule::new(
            id,
            Tuid::new("A").unwrap(),
            Calendar::new(from, from + Duration::days(len), Days::ALL, []).unwrap(),
            stp,
            Vec::new(),
        )
    }

    proptest! {
        #[test]
        fn resolved_records_never_share_a_date(
            base in (0i64..30, 0i64..60),
            revisions in prop::collection::vec((0i64..90, 0i64..30, any::<bool>()), 0..6),
        ) {
            let mut records = vec![record(1, base.0, base.1, Stp::Permanent)];
            for (i, (start, len, cancel)) in revisions.into_iter().enumerate() {
                let stp = if cancel { Stp::Cancellation } else { Stp::Overlay };
                records.push(record(i as u64 + 2, start, len, stp));
            }

            let mut ids = IdGenerator::starting_at(1000);
            let resolved = apply_overlays(records, &mut ids).unwrap().into_records();

            let mut seen = std::collections::HashSet::new();
            for schedule in &resolved {
                prop_assert!(seen.insert(schedule.id), "duplicate id {}", schedule.id);
                prop_assert!(schedule.calendar.first_active().is_some());
            }

            let epoch = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
            for offset in 0..130 {
                let day = epoch + Duration::days(offset);
                let running = resolved.iter().filter(|s| s.calendar.is_active(day)).count();
                prop_assert!(running <= 1, "{} records run on {}", running, day);
            }
        }
    }
}
