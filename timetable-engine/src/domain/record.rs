//! Overlay records: anything carrying a calendar and an STP precedence.

use std::fmt;

use super::{Calendar, DomainError, Tuid};

/// Short-term-plan precedence of a timetable revision.
///
/// Ordered by precedence: overlays and cancellations override the
/// permanent plan they are laid over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stp {
    /// Base timetable.
    Permanent,
    /// Temporary replacement for part of the base timetable.
    Overlay,
    /// Temporary suppression; never kept once applied.
    Cancellation,
}

impl Stp {
    /// Parse a CIF STP indicator ("P", "O" or "C").
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "P" => Some(Stp::Permanent),
            "O" => Some(Stp::Overlay),
            "C" => Some(Stp::Cancellation),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Stp::Permanent => "P",
            Stp::Overlay => "O",
            Stp::Cancellation => "C",
        }
    }
}

impl fmt::Display for Stp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A calendar-scoped timetable record that can be overlaid by later
/// revisions sharing its identifier.
pub trait OverlayRecord {
    fn id(&self) -> u64;

    /// Identifier grouping every revision of the same record.
    fn tuid(&self) -> &Tuid;

    fn stp(&self) -> Stp;

    fn calendar(&self) -> &Calendar;

    /// A copy of this record with a different calendar and id.
    fn clone_with(&self, calendar: Calendar, id: u64) -> Self
    where
        Self: Sized;
}

/// Mints ids for schedules created during a run.
///
/// Seeded past the largest id in the input batch so a minted id never
/// collides with one read from source data, and never repeats.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Generator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Generator whose first id is `max_id + 1`.
    pub fn starting_after(max_id: u64) -> Result<Self, DomainError> {
        max_id
            .checked_add(1)
            .map(Self::starting_at)
            .ok_or(DomainError::IdOverflow)
    }

    /// Generator seeded past every id in `ids`.
    pub fn seeded_from(ids: impl IntoIterator<Item = u64>) -> Result<Self, DomainError> {
        Self::starting_after(ids.into_iter().max().unwrap_or(0))
    }

    /// Returns a fresh id.
    pub fn next_id(&mut self) -> Result<u64, DomainError> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(DomainError::IdOverflow)?;
        Ok(id)
    }
}
