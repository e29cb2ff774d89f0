//! Train operator (ATOC) code type.

use std::fmt;

/// Error returned when parsing an invalid ATOC code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ATOC code: {reason}")]
pub struct InvalidAtocCode {
    reason: &'static str,
}

/// A 2-character ATOC operator code, e.g. "SE" for Southeastern.
///
/// The code becomes the GTFS `agency_id` of the route a schedule is
/// published under. Some operators use a digit in their code, so the
/// accepted alphabet is uppercase ASCII letters and digits.
///
/// # Examples
///
/// ```
/// use timetable_engine::domain::AtocCode;
///
/// let se = AtocCode::parse("SE").unwrap();
/// assert_eq!(se.as_str(), "SE");
/// assert!(AtocCode::parse("se").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtocCode([u8; 2]);

impl AtocCode {
    /// Parse an operator code from exactly 2 uppercase letters or digits.
    pub fn parse(s: &str) -> Result<Self, InvalidAtocCode> {
        let code: [u8; 2] = s.as_bytes().try_into().map_err(|_| InvalidAtocCode {
            reason: "must be exactly 2 characters",
        })?;

        if !code
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(InvalidAtocCode {
                reason: "must be uppercase ASCII letters or digits",
            });
        }

        Ok(AtocCode(code))
    }

    /// Returns the ATOC code as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Debug for AtocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtocCode({})", self.as_str())
    }
}

impl fmt::Display for AtocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
