//! Service-day wall-clock times.
//!
//! GTFS expresses stop times relative to the midnight at the start of the
//! service day, so a train that leaves at 23:50 and arrives ten minutes
//! after midnight arrives at "24:00:00". `ServiceTime` keeps that
//! representation: seconds since service-day midnight, unbounded above
//! one day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Number of seconds in one service day.
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Seconds since midnight of the service day.
///
/// Values of a day or more represent post-midnight continuation of a
/// service that started the previous evening.
///
/// # Examples
///
/// ```
/// use timetable_engine::domain::ServiceTime;
///
/// let t = ServiceTime::parse("23:45:30").unwrap();
/// assert_eq!(t.next_day().to_string(), "47:45:30");
/// assert_eq!(ServiceTime::parse("25:10").unwrap().normalized().to_string(), "01:10:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ServiceTime(u32);

impl ServiceTime {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: ServiceTime = ServiceTime(0);

    /// Create a time from seconds since service-day midnight.
    pub fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Create a time from hour, minute and second components. Hours may be
    /// 24 or more, minutes and seconds must be below 60.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self, TimeError> {
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }
        hour.checked_mul(3600)
            .and_then(|h| h.checked_add(minute * 60 + second))
            .map(Self)
            .ok_or_else(|| TimeError::new("time overflow"))
    }

    /// Parse "HH:MM:SS" or "HH:MM". The hour field may exceed 23.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let hour = parts
            .next()
            .and_then(parse_two_digits)
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minute = parts
            .next()
            .and_then(parse_two_digits)
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        let second = match parts.next() {
            Some(sec) => parse_two_digits(sec).ok_or_else(|| TimeError::new("invalid second digits"))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }
        Self::from_hms(hour, minute, second)
    }

    /// Time-of-day of a timestamp, as seconds after its own midnight.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }

    /// Seconds since service-day midnight.
    pub fn seconds(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 3600
    }

    pub fn minute(self) -> u32 {
        self.0 % 3600 / 60
    }

    pub fn second(self) -> u32 {
        self.0 % 60
    }

    /// The same wall-clock time one day later.
    pub fn next_day(self) -> Self {
        Self(self.0 + SECONDS_PER_DAY)
    }

    /// True when the time is past the end of the service day.
    pub fn is_after_midnight(self) -> bool {
        self.0 >= SECONDS_PER_DAY
    }

    /// Fold the hour back into 0-23.
    pub fn normalized(self) -> Self {
        Self(self.0 % SECONDS_PER_DAY)
    }

    /// Wall-clock reading of this time on `date`, ignoring which day it
    /// rolled over from.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        let normalized = self.normalized().0;
        date.and_time(NaiveTime::MIN) + Duration::seconds(i64::from(normalized))
    }

    /// Absolute instant of this time for a service running on `service_day`.
    /// Times past 24:00:00 land on the following calendar date.
    pub fn on_service_day(self, service_day: NaiveDate) -> NaiveDateTime {
        service_day.and_time(NaiveTime::MIN) + Duration::seconds(i64::from(self.0))
    }

    /// Seconds between `service_day` midnight and `instant`, if the instant
    /// is not before that midnight.
    pub fn since_service_day(instant: NaiveDateTime, service_day: NaiveDate) -> Option<Self> {
        let elapsed = instant
            .signed_duration_since(service_day.and_time(NaiveTime::MIN))
            .num_seconds();
        u32::try_from(elapsed).ok().map(Self)
    }
}

impl fmt::Debug for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceTime({self})")
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse two ASCII digits into a u32.
fn parse_two_digits(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_display_roundtrip(h in 0u32..48, m in 0u32..60, s in 0u32..60) {
            let text = format!("{h:02}:{m:02}:{s:02}");
            let t = ServiceTime::parse(&text).unwrap();
            prop_assert_eq!(t.to_string(), text);
        }

        #[test]
        fn normalized_is_within_a_day(secs in 0u32..(3 * SECONDS_PER_DAY)) {
            let t = ServiceTime::from_seconds(secs).normalized();
            prop_assert!(t.seconds() < SECONDS_PER_DAY);
            prop_assert_eq!(t.seconds(), secs % SECONDS_PER_DAY);
        }

        #[test]
        fn ordering_matches_seconds(a in 0u32..200_000, b in 0u32..200_000) {
            let (ta, tb) = (ServiceTime::from_seconds(a), ServiceTime::from_seconds(b));
            prop_assert_eq!(ta.cmp(&tb), a.cmp(&b));
        }
    }
}
