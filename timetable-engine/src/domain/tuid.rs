//! Train UID type.

use std::fmt;

/// Error returned when constructing an invalid train UID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid train UID: {reason}")]
pub struct InvalidTuid {
    reason: &'static str,
}

/// Train unique identifier grouping every STP revision of one timetabled
/// service.
///
/// Timetable TUIDs look like `C12345`, but merged schedules and association
/// records build composite identifiers such as `C12345_C67890`, so the only
/// rule enforced is that the identifier is non-empty.
///
/// # Examples
///
/// ```
/// use timetable_engine::domain::Tuid;
///
/// let base = Tuid::new("C12345").unwrap();
/// let assoc = Tuid::new("C67890").unwrap();
/// assert_eq!(base.joined_with(&assoc).as_str(), "C12345_C67890");
/// assert!(Tuid::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tuid(String);

impl Tuid {
    /// Create a train UID, rejecting empty strings.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidTuid> {
        let s = s.into();
        if s.is_empty() {
            return Err(InvalidTuid {
                reason: "train UID cannot be empty",
            });
        }
        Ok(Tuid(s))
    }

    /// Identifier of a through service formed by running `self` then `next`.
    pub fn joined_with(&self, next: &Tuid) -> Tuid {
        Tuid(format!("{}_{}", self.0, next.0))
    }

    /// Identifier shared by every revision of the association between
    /// `base` and `assoc`.
    pub fn for_association(base: &Tuid, assoc: &Tuid) -> Tuid {
        Tuid(format!("{}_{}_", base.0, assoc.0))
    }

    /// Returns the train UID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Tuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tuid({})", self.0)
    }
}

impl fmt::Display for Tuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
