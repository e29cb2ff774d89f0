//! Timetabled schedules.
//!
//! A `Schedule` is one train's stopping pattern together with the
//! calendar of dates it runs that pattern, plus the metadata the output
//! layer needs to publish it as a GTFS trip.

use super::{AtocCode, Calendar, Crs, OverlayRecord, StopTime, Stp, Tuid};

/// GTFS route type of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteType {
    Tram,
    Subway,
    #[default]
    Rail,
    Bus,
    Ferry,
    Gondola,
}

impl RouteType {
    /// Map a CIF train category to the mode it is published as. Unknown
    /// categories are ordinary rail services.
    pub fn from_train_category(category: &str) -> Self {
        match category.trim() {
            "BR" => RouteType::Gondola,
            "BS" => RouteType::Bus,
            "OL" => RouteType::Subway,
            "SS" => RouteType::Ferry,
            _ => RouteType::Rail,
        }
    }

    pub fn gtfs_code(self) -> u16 {
        match self {
            RouteType::Tram => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::Gondola => 6,
        }
    }
}

/// A train's stopping pattern over a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Unique within a run; for real-time schedules this is the train
    /// activation id.
    pub id: u64,
    pub stop_times: Vec<StopTime>,
    pub tuid: Tuid,
    /// Retail service id
    pub rsid: Option<String>,
    pub calendar: Calendar,
    pub mode: RouteType,
    pub operator: Option<AtocCode>,
    pub stp: Stp,
    pub first_class_available: bool,
    pub reservation_possible: bool,
}

impl Schedule {
    /// Create a rail schedule with no operator or retail metadata.
    pub fn new(id: u64, tuid: Tuid, calendar: Calendar, stp: Stp, stop_times: Vec<StopTime>) -> Self {
        Self {
            id,
            stop_times,
            tuid,
            rsid: None,
            calendar,
            mode: RouteType::Rail,
            operator: None,
            stp,
            first_class_available: false,
            reservation_possible: false,
        }
    }

    pub fn origin(&self) -> Option<&StopTime> {
        self.stop_times.first()
    }

    pub fn destination(&self) -> Option<&StopTime> {
        self.stop_times.last()
    }

    /// Index of the first call at `location`.
    pub fn position_of(&self, location: &Crs) -> Option<usize> {
        self.stop_times.iter().position(|s| &s.stop_id == location)
    }

    /// The first call at `location`.
    pub fn stop_at(&self, location: &Crs) -> Option<&StopTime> {
        self.position_of(location).map(|i| &self.stop_times[i])
    }

    /// Stops strictly before the first call at `location`; empty if the
    /// schedule does not call there.
    pub fn before(&self, location: &Crs) -> &[StopTime] {
        match self.position_of(location) {
            Some(i) => &self.stop_times[..i],
            None => &[],
        }
    }

    /// Stops strictly after the first call at `location`; empty if the
    /// schedule does not call there.
    pub fn after(&self, location: &Crs) -> &[StopTime] {
        match self.position_of(location) {
            Some(i) => &self.stop_times[i + 1..],
            None => &[],
        }
    }

    /// Number the stops 1, 2, 3... in their current order.
    pub fn renumber_stops(&mut self) {
        for (seq, stop) in (1..).zip(self.stop_times.iter_mut()) {
            stop.stop_sequence = seq;
        }
    }

    /// Do the two schedules publish the same trip apart from their dates?
    pub fn has_same_service_as(&self, other: &Schedule) -> bool {
        self.tuid == other.tuid
            && self.rsid == other.rsid
            && self.mode == other.mode
            && self.operator == other.operator
            && self.first_class_available == other.first_class_available
            && self.reservation_possible == other.reservation_possible
            && self.stop_times.len() == other.stop_times.len()
            && self
                .stop_times
                .iter()
                .zip(&other.stop_times)
                .all(|(a, b)| a.publishes_same_as(b))
    }
}

impl OverlayRecord for Schedule {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Activity, Days, ServiceTime};
    use chrono::NaiveDate;

    fn crs(s: &str) -> Crs {
        Crs::parse(s).unwrap()
    }

    fn stop(seq: u32, location: &str, time: &str) -> StopTime {
        let t = ServiceTime::parse(time).unwrap();
        StopTime::new(crs(location), seq, Some(t), Some(t))
    }

    fn schedule(stops: Vec<StopTime>) -> Schedule {
        let d = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        Schedule::new(
            1,
            Tuid::new("A").unwrap(),
            Calendar::new(d, d, Days::ALL, []).unwrap(),
            Stp::Permanent,
            stops,
        )
    }

    #[test]
    fn route_type_from_category() {
        assert_eq!(RouteType::from_train_category("BS"), RouteType::Bus);
        assert_eq!(RouteType::from_train_category("XX"), RouteType::Rail);
        assert_eq!(RouteType::from_train_category(""), RouteType::Rail);
        assert_eq!(RouteType::Ferry.gtfs_code(), 4);
    }

    #[test]
    fn before_and_after_split_at_first_call() {
        let s = schedule(vec![
            stop(1, "ASH", "10:00"),
            stop(2, "TON", "10:10"),
            stop(3, "SEV", "10:20"),
        ]);
        assert_eq!(s.before(&crs("TON")).len(), 1);
        assert_eq!(s.after(&crs("TON")).len(), 1);
        assert_eq!(s.stop_at(&crs("SEV")).unwrap().stop_sequence, 3);
        assert!(s.before(&crs("CHX")).is_empty());
        assert!(s.after(&crs("CHX")).is_empty());
        assert_eq!(s.origin().unwrap().stop_id, crs("ASH"));
        assert_eq!(s.destination().unwrap().stop_id, crs("SEV"));
    }

    #[test]
    fn renumber_after_truncation() {
        let mut s = schedule(vec![
            stop(1, "ASH", "10:00"),
            stop(2, "TON", "10:10"),
            stop(3, "SEV", "10:20"),
        ]);
        s.stop_times.remove(0);
        s.renumber_stops();
        let seqs: Vec<_> = s.stop_times.iter().map(|s| s.stop_sequence).collect();
        assert_eq!(seqs, vec![1, 2]);
    }

    #[test]
    fn same_service_ignores_calendar_and_internal_fields() {
        let a = schedule(vec![stop(1, "ASH", "10:00")]);
        let mut b = a.clone_with(a.calendar.clone(), 7);
        b.stop_times[0].correction_ind_total = 3;
        b.stop_times[0].scheduled_location_id = Some(99);
        assert!(a.has_same_service_as(&b));

        b.stop_times[0].pickup_type = Activity::NotAvailable;
        assert!(!a.has_same_service_as(&b));
    }

    #[test]
    fn clone_with_keeps_metadata() {
        let mut a = schedule(vec![stop(1, "ASH", "10:00")]);
        a.operator = Some(AtocCode::parse("SE").unwrap());
        let d = NaiveDate::from_ymd_opt(2017, 2, 1).unwrap();
        let cal = Calendar::new(d, d, Days::ALL, []).unwrap();
        let b = a.clone_with(cal.clone(), 42);
        assert_eq!(b.id, 42);
        assert_eq!(b.calendar, cal);
        assert_eq!(b.operator, a.operator);
        assert_eq!(b.stop_times, a.stop_times);
    }
}
