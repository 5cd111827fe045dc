//! Error types for configuration loading and validation
//!
//! The projection engine and comparison analyzer never fail; errors only
//! arise at the boundary where scenarios are parsed and checked.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("unrecognized compounding frequency {0:?} (expected Daily, Monthly, Quarterly or Annually)")]
    UnknownCompounding(String),

    #[error("invalid month {0:?} (expected YYYY-MM or YYYY-MM-DD)")]
    InvalidMonth(String),

    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
