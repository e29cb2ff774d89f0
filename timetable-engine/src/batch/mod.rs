//! Batch files: one closed set of timetable records as JSON.

mod convert;
mod error;
mod types;

use std::path::Path;

pub use convert::convert_batch;
pub use error::BatchError;
pub use types::{
    AssociationRow, BatchFile, CalendarRow, CancellationRow, ChangeOfOriginRow, EventRow,
    ReinstatementRow, ScheduleRow, StopTimeRow,
};

use crate::resolve::Timetable;

/// Parse a JSON batch and convert it to domain types.
pub fn from_json(json: &str) -> Result<Timetable, BatchError> {
    let file: BatchFile = serde_json::from_str(json)?;
    convert_batch(file)
}

/// Read and convert the batch file at `path`.
pub fn load(path: &Path) -> Result<Timetable, BatchError> {
    let json = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&json)
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
