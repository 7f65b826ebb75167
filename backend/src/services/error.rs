//! Errors raised by aggregation parameters and view services.
//!
//! The aggregation functions themselves never fail on data (empty or sparse
//! input yields empty or zero results); only malformed parameters do.

use crate::db::SourceError;

/// Error type for invalid aggregation parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregationError {
    /// Histogram boundaries are too few, non-finite or not strictly ascending.
    #[error("Invalid bucket boundaries: {0}")]
    InvalidBoundaries(String),

    /// Directional threshold is negative or non-finite.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(f64),

    /// Hour or quarter index outside its day.
    #[error("Invalid {kind} slot: {value}")]
    InvalidSlot { kind: &'static str, value: i64 },

    /// Inverted or oversized date window.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
}

pub type AggregationResult<T> = Result<T, AggregationError>;

/// Failure of a view service: either the fetch or the request parameters.
///
/// A fetch failure short-circuits the view; aggregation is never run on a
/// partial row-set.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

pub type ViewResult<T> = Result<T, ViewError>;
