//! Domain error types.
//!
//! These errors represent structural violations in the timetable data:
//! conditions that mean the batch itself is defective. Per-record
//! anomalies such as an unmatched real-time event are logged and skipped
//! instead of surfacing here.

use chrono::NaiveDate;

use super::{Crs, Tuid};

/// Domain-level errors for structural invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A calendar whose start is after its end
    #[error("invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Shifting a date moved it outside the representable range
    #[error("date overflow shifting {0}")]
    DateOverflow(NaiveDate),

    /// The id generator ran out of ids
    #[error("schedule id space exhausted")]
    IdOverflow,

    /// An association names a location one of its trains never calls at
    #[error("association location {location} not found in schedule {tuid}")]
    MissingAssociationStop { tuid: Tuid, location: Crs },
}
