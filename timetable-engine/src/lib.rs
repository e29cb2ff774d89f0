//! Timetable resolution engine.
//!
//! Turns layered short-term-plan timetable revisions, split/join
//! associations and real-time variation events into a flat set of
//! date-exact schedules ready to be written out as a GTFS feed.

pub mod batch;
pub mod domain;
pub mod output;
pub mod resolve;
