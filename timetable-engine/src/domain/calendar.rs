//! Schedule validity calendars.
//!
//! A `Calendar` is an inclusive date range, a weekly day mask and a set of
//! explicitly excluded dates. Overlay resolution works by comparing and
//! cutting calendars, so every operation that produces a new calendar
//! trims it back to its active dates and refuses to produce one that
//! never runs.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use super::DomainError;

/// Shared windows shorter than this are removed by excluding dates rather
/// than by splitting the date range.
const SHORT_OVERLAP_DAYS: i64 = 7;

/// How one calendar overlaps another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapType {
    /// The date ranges do not intersect.
    None,
    /// The overlap is removed by adding exclude days.
    Short,
    /// The overlap is removed by dividing the range around it.
    Full,
}

/// Weekly running pattern, one bit per weekday (bit 0 is Sunday).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Days(u8);

impl Days {
    /// Runs every day of the week.
    pub const ALL: Days = Days(0b111_1111);

    /// Never runs.
    pub const NONE: Days = Days(0);

    /// Build from flags in Monday..Sunday order, the column order used by
    /// timetable records and GTFS `calendar.txt`.
    pub fn from_monday_flags(flags: [bool; 7]) -> Self {
        let mask = flags
            .iter()
            .enumerate()
            .filter(|(_, runs)| **runs)
            .fold(0u8, |mask, (i, _)| mask | 1 << ((i + 1) % 7));
        Days(mask)
    }

    /// Parse a 7-character "1111100" string, Monday first.
    ///
    /// ```
    /// use chrono::Weekday;
    /// use timetable_engine::domain::Days;
    ///
    /// let weekdays = Days::parse("1111100").unwrap();
    /// assert!(weekdays.runs_on(Weekday::Fri));
    /// assert!(!weekdays.runs_on(Weekday::Sun));
    /// assert!(Days::parse("11111").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; 7] = s.as_bytes().try_into().ok()?;
        let mut flags = [false; 7];
        for (flag, b) in flags.iter_mut().zip(bytes) {
            *flag = match b {
                b'1' => true,
                b'0' => false,
                _ => return None,
            };
        }
        Some(Self::from_monday_flags(flags))
    }

    /// Flags in Monday..Sunday order.
    pub fn monday_flags(self) -> [bool; 7] {
        std::array::from_fn(|i| self.0 & (1 << ((i + 1) % 7)) != 0)
    }

    pub fn runs_on(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_sunday()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersection(self, other: Days) -> Days {
        Days(self.0 & other.0)
    }

    /// The pattern of a train running one day later (Sunday becomes Monday).
    pub fn shift_forward(self) -> Days {
        Days(((self.0 << 1) | (self.0 >> 6)) & Self::ALL.0)
    }

    /// The pattern of a train running one day earlier (Monday becomes Sunday).
    pub fn shift_backward(self) -> Days {
        Days(((self.0 >> 1) | (self.0 << 6)) & Self::ALL.0)
    }

    /// "1111100" style string, Monday first.
    pub fn to_binary_string(self) -> String {
        self.monday_flags()
            .iter()
            .map(|runs| if *runs { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Debug for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Days({})", self.to_binary_string())
    }
}

/// The set of dates a schedule or association is in force.
///
/// `runs_from <= runs_to` always holds, and exclude days only ever lie
/// inside the range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Calendar {
    runs_from: NaiveDate,
    runs_to: NaiveDate,
    days: Days,
    exclude_days: BTreeSet<NaiveDate>,
}

impl Calendar {
    /// Create a calendar. Exclude days outside the range are dropped.
    pub fn new(
        runs_from: NaiveDate,
        runs_to: NaiveDate,
        days: Days,
        exclude_days: impl IntoIterator<Item = NaiveDate>,
    ) -> Result<Self, DomainError> {
        if runs_from > runs_to {
            return Err(DomainError::InvalidDateRange {
                from: runs_from,
                to: runs_to,
            });
        }
        Ok(Self {
            runs_from,
            runs_to,
            days,
            exclude_days: exclude_days
                .into_iter()
                .filter(|d| (runs_from..=runs_to).contains(d))
                .collect(),
        })
    }

    pub fn runs_from(&self) -> NaiveDate {
        self.runs_from
    }

    pub fn runs_to(&self) -> NaiveDate {
        self.runs_to
    }

    pub fn days(&self) -> Days {
        self.days
    }

    pub fn exclude_days(&self) -> &BTreeSet<NaiveDate> {
        &self.exclude_days
    }

    /// Same day mask and exclusions over a different range.
    ///
    /// Returns `None` when `from > to`.
    pub fn clone_with_range(&self, from: NaiveDate, to: NaiveDate) -> Option<Self> {
        if from > to {
            return None;
        }
        Some(Self {
            runs_from: from,
            runs_to: to,
            days: self.days,
            exclude_days: self
                .exclude_days
                .range(from..=to)
                .copied()
                .collect(),
        })
    }

    /// Does the calendar run on `date`?
    pub fn is_active(&self, date: NaiveDate) -> bool {
        date >= self.runs_from
            && date <= self.runs_to
            && self.days.runs_on(date.weekday())
            && !self.exclude_days.contains(&date)
    }

    /// Every date in the range, active or not.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        date_range(self.runs_from, self.runs_to)
    }

    /// Dates the calendar actually runs on, in order.
    pub fn active_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates().filter(|d| self.is_active(*d))
    }

    pub fn first_active(&self) -> Option<NaiveDate> {
        self.active_dates().next()
    }

    pub fn last_active(&self) -> Option<NaiveDate> {
        std::iter::successors(Some(self.runs_to), |d| d.pred_opt())
            .take_while(|d| *d >= self.runs_from)
            .find(|d| self.is_active(*d))
    }

    /// Trim the range to the first and last active dates.
    ///
    /// Returns `None` if the calendar never runs.
    pub fn shrink(&self) -> Option<Self> {
        let first = self.first_active()?;
        let last = self.last_active()?;
        self.clone_with_range(first, last)
    }

    /// The intersection of the two date ranges, ignoring day masks.
    fn shared_window(&self, other: &Calendar) -> Option<(NaiveDate, NaiveDate)> {
        let from = self.runs_from.max(other.runs_from);
        let to = self.runs_to.min(other.runs_to);
        (from <= to).then_some((from, to))
    }

    /// Classify how `other` overlaps this calendar.
    ///
    /// `Full` means the shared window can be cut out of this calendar
    /// wholesale: it is at least a week long, and on every date this
    /// calendar runs within it `other` runs too. Any other intersection is
    /// `Short` and is removed date by date.
    pub fn get_overlap(&self, other: &Calendar) -> OverlapType {
        let Some((from, to)) = self.shared_window(other) else {
            return OverlapType::None;
        };

        let mut runs_in_window = false;
        for date in date_range(from, to) {
            if self.is_active(date) {
                if !other.is_active(date) {
                    return OverlapType::Short;
                }
                runs_in_window = true;
            }
        }

        let window_days = to.signed_duration_since(from).num_days() + 1;
        if runs_in_window && window_days >= SHORT_OVERLAP_DAYS {
            OverlapType::Full
        } else {
            OverlapType::Short
        }
    }

    /// This calendar with every date `other` runs on excluded.
    ///
    /// Returns no calendar when nothing would be left running.
    pub fn add_exclude_days(&self, other: &Calendar) -> Vec<Calendar> {
        let mut excluded = self.clone();
        if let Some((from, to)) = self.shared_window(other) {
            excluded
                .exclude_days
                .extend(date_range(from, to).filter(|d| self.is_active(*d) && other.is_active(*d)));
        }
        excluded.shrink().into_iter().collect()
    }

    /// The parts of this calendar strictly before and strictly after
    /// `other`'s range. The overlapping part is dropped; parts that never
    /// run are omitted.
    pub fn divide_around(&self, other: &Calendar) -> Vec<Calendar> {
        let before = other
            .runs_from
            .pred_opt()
            .and_then(|end| self.clone_with_range(self.runs_from, end.min(self.runs_to)));
        let after = other
            .runs_to
            .succ_opt()
            .and_then(|start| self.clone_with_range(start.max(self.runs_from), self.runs_to));

        [before, after]
            .into_iter()
            .flatten()
            .filter_map(|c| c.shrink())
            .collect()
    }

    /// Dates both calendars run on, or `None` if there are none.
    pub fn intersect(&self, other: &Calendar) -> Option<Calendar> {
        let (from, to) = self.shared_window(other)?;
        Calendar {
            runs_from: from,
            runs_to: to,
            days: self.days.intersection(other.days),
            exclude_days: self
                .exclude_days
                .union(&other.exclude_days)
                .copied()
                .filter(|d| (from..=to).contains(d))
                .collect(),
        }
        .shrink()
    }

    /// One calendar running on every date either calendar runs on.
    ///
    /// Only defined for calendars with the same day mask whose ranges
    /// overlap or touch; anything else would need dates added that neither
    /// calendar runs on.
    pub fn union(&self, other: &Calendar) -> Option<Calendar> {
        if self.days != other.days {
            return None;
        }
        let gap_after = other.runs_from.signed_duration_since(self.runs_to).num_days();
        let gap_before = self.runs_from.signed_duration_since(other.runs_to).num_days();
        if gap_after > 1 || gap_before > 1 {
            return None;
        }

        let exclude_days = self
            .exclude_days
            .iter()
            .filter(|d| !other.is_active(**d))
            .chain(other.exclude_days.iter().filter(|d| !self.is_active(**d)))
            .copied()
            .collect();

        Some(Calendar {
            runs_from: self.runs_from.min(other.runs_from),
            runs_to: self.runs_to.max(other.runs_to),
            days: self.days,
            exclude_days,
        })
    }

    /// The calendar of a train running one day later, for associations
    /// across next midnight.
    pub fn shift_forward(&self) -> Result<Calendar, DomainError> {
        self.shifted(NaiveDate::succ_opt, self.days.shift_forward())
    }

    /// The calendar of a train running one day earlier.
    pub fn shift_backward(&self) -> Result<Calendar, DomainError> {
        self.shifted(NaiveDate::pred_opt, self.days.shift_backward())
    }

    fn shifted(
        &self,
        step: fn(&NaiveDate) -> Option<NaiveDate>,
        days: Days,
    ) -> Result<Calendar, DomainError> {
        let shift = |d: &NaiveDate| step(d).ok_or(DomainError::DateOverflow(*d));
        Ok(Calendar {
            runs_from: shift(&self.runs_from)?,
            runs_to: shift(&self.runs_to)?,
            days,
            exclude_days: self
                .exclude_days
                .iter()
                .map(shift)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Day mask as a "1111100" string, Monday first.
    pub fn binary_days(&self) -> String {
        self.days.to_binary_string()
    }
}

/// Inclusive iterator over `from..=to`.
fn date_range(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |d| *d <= to)
}
