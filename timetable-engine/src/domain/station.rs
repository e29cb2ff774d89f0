//! Location code type.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an invalid CRS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CRS code {input:?}: {reason}")]
pub struct InvalidCrs {
    input: String,
    reason: &'static str,
}

/// A 3-letter CRS location code identifying the station a stop calls at.
///
/// Stop times, associations and variation events all refer to locations by
/// CRS, so this is the key used when matching a real-time event to a stop.
///
/// # Examples
///
/// ```
/// use timetable_engine::domain::Crs;
///
/// let ash = Crs::parse("ASH").unwrap();
/// assert_eq!(ash.as_str(), "ASH");
///
/// assert!(Crs::parse("ash").is_err());
/// assert!(Crs::parse("ASHF").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Crs([u8; 3]);

impl Crs {
    /// Parse a CRS code. Surrounding whitespace is ignored, the code itself
    /// must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidCrs> {
        let invalid = |reason| InvalidCrs {
            input: s.to_string(),
            reason,
        };

        let bytes = s.trim().as_bytes();
        let code: [u8; 3] = bytes
            .try_into()
            .map_err(|_| invalid("must be exactly 3 characters"))?;

        if !code.iter().all(u8::is_ascii_uppercase) {
            return Err(invalid("must be uppercase ASCII letters A-Z"));
        }

        Ok(Crs(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only uppercase ASCII is ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Crs {
    type Err = InvalidCrs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crs::parse(s)
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crs({})", self.as_str())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn uppercase_triples_roundtrip(s in "[A-Z]{3}") {
            let crs = Crs::parse(&s).unwrap();
            prop_assert_eq!(crs.as_str(), s.as_str());
        }

        #[test]
        fn other_lengths_rejected(s in "[A-Z]{0,2}|[A-Z]{4,8}") {
            prop_assert!(Crs::parse(&s).is_err());
        }
    }
}
