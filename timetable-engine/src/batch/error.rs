//! Batch loading error types.

use std::path::PathBuf;

use crate::domain::{DomainError, InvalidAtocCode, InvalidCrs, InvalidTuid, TimeError};

/// Errors from reading a batch file and converting it to domain types.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The batch file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch is not valid JSON or has the wrong shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {id}: {source}")]
    Crs {
        id: u64,
        #[source]
        source: InvalidCrs,
    },

    #[error("record {id}: {source}")]
    Tuid {
        id: u64,
        #[source]
        source: InvalidTuid,
    },

    #[error("record {id}: {source}")]
    Operator {
        id: u64,
        #[source]
        source: InvalidAtocCode,
    },

    #[error("record {id}: {source}")]
    Time {
        id: u64,
        #[source]
        source: TimeError,
    },

    /// A date, datetime or day mask that does not parse
    #[error("record {id}: invalid {field} {value:?}")]
    InvalidValue {
        id: u64,
        field: &'static str,
        value: String,
    },

    #[error("record {id}: {source}")]
    Domain {
        id: u64,
        #[source]
        source: DomainError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Crs;

    #[test]
    fn error_display() {
        let err = BatchError::InvalidValue {
            id: 4,
            field: "stp",
            value: "X".into(),
        };
        assert_eq!(err.to_string(), "record 4: invalid stp \"X\"");

        let err = BatchError::Crs {
            id: 9,
            source: Crs::parse("ab").unwrap_err(),
        };
        assert!(err.to_string().starts_with("record 9: invalid CRS"));
    }
}
