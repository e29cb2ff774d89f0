//! Split and join associations between two trains.
//!
//! An association says that on the dates of its calendar the associated
//! train is attached to the base train for part of its journey: a split
//! (the base train divides and the associated train carries on from the
//! shared location) or a join (the associated train runs in and joins the
//! base train). Applying one produces a through schedule that a passenger
//! can stay on across the shared location.

use tracing::debug;

use super::{
    Calendar, Crs, DomainError, IdGenerator, OverlayRecord, Schedule, ServiceTime, StopTime, Stp,
    Tuid,
};

/// Which day the associated train is at the shared location, relative to
/// the base train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateIndicator {
    Same,
    /// The associated train is there the day after the base train
    Next,
    /// The associated train is there the day before the base train
    Previous,
}

impl DateIndicator {
    /// Parse a CIF date indicator ("S", "N" or "P").
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(DateIndicator::Same),
            "N" => Some(DateIndicator::Next),
            "P" => Some(DateIndicator::Previous),
            _ => None,
        }
    }
}

/// What happens at the shared location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationType {
    /// The base train divides; the associated train runs on from the
    /// shared location.
    Split,
    /// The associated train runs in and joins the base train.
    Join,
    /// Any other category, e.g. a next-working link. Not applied.
    NotApplicable,
}

impl AssociationType {
    /// Parse a CIF association category ("VV" divide, "JJ" join).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "VV" => AssociationType::Split,
            "JJ" => AssociationType::Join,
            _ => AssociationType::NotApplicable,
        }
    }
}

/// A calendar-scoped link between a base and an associated train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub id: u64,
    pub base_tuid: Tuid,
    pub assoc_tuid: Tuid,
    pub assoc_location: Crs,
    pub date_indicator: DateIndicator,
    pub assoc_type: AssociationType,
    /// Dates the association applies, in terms of the base train
    pub calendar: Calendar,
    pub stp: Stp,
    tuid: Tuid,
}

impl Association {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        base_tuid: Tuid,
        assoc_tuid: Tuid,
        assoc_location: Crs,
        date_indicator: DateIndicator,
        assoc_type: AssociationType,
        calendar: Calendar,
        stp: Stp,
    ) -> Self {
        let tuid = Tuid::for_association(&base_tuid, &assoc_tuid);
        Self {
            id,
            base_tuid,
            assoc_tuid,
            assoc_location,
            date_indicator,
            assoc_type,
            calendar,
            stp,
            tuid,
        }
    }

    /// The association calendar in terms of the associated train's dates.
    pub fn effective_calendar(&self) -> Result<Calendar, DomainError> {
        match self.date_indicator {
            DateIndicator::Next => self.calendar.shift_forward(),
            DateIndicator::Same | DateIndicator::Previous => Ok(self.calendar.clone()),
        }
    }

    /// Dates, in terms of the base train, on which the association applies
    /// and both `base` and `assoc` run.
    pub fn shared_dates(&self, base: &Schedule, assoc: &Schedule) -> Result<Option<Calendar>, DomainError> {
        let assoc_dates = match self.date_indicator {
            DateIndicator::Next => assoc.calendar.shift_backward()?,
            DateIndicator::Same | DateIndicator::Previous => assoc.calendar.clone(),
        };
        Ok(self
            .calendar
            .intersect(&assoc_dates)
            .and_then(|dates| dates.intersect(&base.calendar)))
    }

    /// Apply the split or join to `assoc`.
    ///
    /// `bases` are the resolved schedules of the base train. Each one
    /// sharing running dates with `assoc` yields a merged through schedule
    /// for those dates; the first keeps the id of `assoc` and later ones
    /// get fresh ids. They are followed by copies of `assoc` for any dates
    /// it runs before the association starts or after it ends. Those copies
    /// are not adjusted for exclude days: when variation data is applied
    /// later it decides what actually ran.
    pub fn apply(
        &self,
        bases: &[Schedule],
        assoc: &Schedule,
        ids: &mut IdGenerator,
    ) -> Result<Vec<Schedule>, DomainError> {
        let assoc_calendar = self.effective_calendar()?;
        let mut schedules = Vec::with_capacity(bases.len() + 2);

        for base in bases {
            let Some(calendar) = self.shared_dates(base, assoc)? else {
                continue;
            };
            let id = if schedules.is_empty() { assoc.id } else { ids.next_id()? };
            schedules.push(self.merge_schedules(base, assoc, calendar, id)?);
        }
        if schedules.is_empty() {
            debug!(
                association = %self.tuid,
                "no base schedule shares running dates with the associated schedule"
            );
        }

        let solo = &assoc.calendar;

        if solo.runs_from() < assoc_calendar.runs_from() {
            let before = assoc_calendar
                .runs_from()
                .pred_opt()
                .and_then(|end| solo.clone_with_range(solo.runs_from(), end))
                .and_then(|c| c.shrink());
            if let Some(before) = before {
                schedules.push(assoc.clone_with(before, ids.next_id()?));
            }
        }

        if solo.runs_to() > assoc_calendar.runs_to() {
            let after = assoc_calendar
                .runs_to()
                .succ_opt()
                .and_then(|start| solo.clone_with_range(start, solo.runs_to()))
                .and_then(|c| c.shrink());
            if let Some(after) = after {
                schedules.push(assoc.clone_with(after, ids.next_id()?));
            }
        }

        Ok(schedules)
    }

    /// Splice the two stopping patterns together at the shared location.
    fn merge_schedules(
        &self,
        base: &Schedule,
        assoc: &Schedule,
        calendar: Calendar,
        id: u64,
    ) -> Result<Schedule, DomainError> {
        let location = &self.assoc_location;
        let (first, second) = match self.assoc_type {
            AssociationType::Join => (assoc, base),
            AssociationType::Split | AssociationType::NotApplicable => (base, assoc),
        };

        let arriving = first
            .stop_at(location)
            .ok_or_else(|| missing_stop(first, location))?;
        let departing = second
            .stop_at(location)
            .ok_or_else(|| missing_stop(second, location))?;
        let junction = self.merge_association_stop(arriving, departing);
        let junction_time = junction.arrival_time.unwrap_or(ServiceTime::MIDNIGHT);

        let mut stop_times: Vec<StopTime> = first.before(location).to_vec();
        stop_times.push(junction);
        stop_times.extend(
            second
                .after(location)
                .iter()
                .map(|s| continue_after(s, junction_time)),
        );
        for (seq, stop) in (1..).zip(stop_times.iter_mut()) {
            stop.stop_sequence = seq;
        }

        Ok(Schedule {
            id,
            stop_times,
            tuid: first.tuid.joined_with(&second.tuid),
            rsid: assoc.rsid.clone(),
            calendar,
            mode: assoc.mode,
            operator: assoc.operator,
            stp: assoc.stp,
            first_class_available: assoc.first_class_available,
            reservation_possible: assoc.reservation_possible,
        })
    }

    /// Combine the arrival at the shared location from the arriving train
    /// with the departure from the departing train.
    ///
    /// An arrival later than the departure is taken as a midnight
    /// rollover: across next midnight the departure moves a day forward,
    /// otherwise the departing train's own arrival is used.
    pub fn merge_association_stop(&self, arrival_stop: &StopTime, departure_stop: &StopTime) -> StopTime {
        let mut arrival_time = arrival_stop.arrival_time;
        let mut departure_time = departure_stop.departure_time;

        if let (Some(arrival), Some(departure)) = (arrival_time, departure_time) {
            if arrival > departure {
                if self.date_indicator == DateIndicator::Next {
                    departure_time = Some(departure.next_day());
                } else {
                    arrival_time = departure_stop.arrival_time;
                }
            }
        }

        StopTime {
            arrival_time,
            departure_time,
            pickup_type: departure_stop.pickup_type,
            drop_off_type: arrival_stop.drop_off_type,
            ..arrival_stop.clone()
        }
    }
}

impl OverlayRecord for Association {
    fn id(&self) -> u64 {
        self.id
    }

    fn tuid(&self) -> &Tuid {
        &self.tuid
    }

    fn stp(&self) -> Stp {
        self.stp
    }

    fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    fn clone_with(&self, calendar: Calendar, id: u64) -> Self {
        Self {
            id,
            calendar,
            ..self.clone()
        }
    }
}

fn missing_stop(schedule: &Schedule, location: &Crs) -> DomainError {
    DomainError::MissingAssociationStop {
        tuid: schedule.tuid.clone(),
        location: *location,
    }
}

/// Copy of a stop after the shared location, moved a day forward if it
/// reads earlier than the junction.
fn continue_after(stop: &StopTime, junction_time: ServiceTime) -> StopTime {
    let roll = |t: Option<ServiceTime>| t.map(|t| if t < junction_time { t.next_day() } else { t });
    StopTime {
        arrival_time: roll(stop.arrival_time),
        departure_time: roll(stop.departure_time),
        ..stop.clone()
    }
}

#[cfg(test)]
#[path = "association_tests.rs"]
mod tests;
