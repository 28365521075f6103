use thiserror::Error;

/// Errors reported for malformed engine configuration or input.
///
/// The rating math itself has no recoverable error conditions; everything
/// here is caught before any rating is touched.
#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("K-factor table must contain at least one entry")]
    EmptyKFactorTable,

    #[error("K-factor table has no unbounded entry: a rating below {lowest_boundary} would have no K")]
    UnboundedEntryMissing { lowest_boundary: f64 },

    #[error("Tally scoring table must contain at least one entry")]
    EmptyTallyTable,

    #[error("Game scores must be finite, got {score}")]
    NonFiniteScore { score: f64 },

    #[error("Rating periods must be non-decreasing: period {current} arrived after {previous}")]
    PeriodOrder { previous: i64, current: i64 }
}
