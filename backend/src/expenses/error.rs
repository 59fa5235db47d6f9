//! Expense domain errors
//!
//! Repository failures and service-level rule violations. The service
//! translates [`RepositoryError::NotFound`] into [`ExpenseError::UnknownId`]
//! and carries every other repository failure through unchanged.

use super::models::ExpenseId;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors reported by an [`ExpenseRepository`](super::ExpenseRepository)
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No stored record has the given id
    #[error("no expense record with id {0}")]
    NotFound(ExpenseId),

    /// The storage medium failed (unreachable, corrupt, I/O)
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Why a summary modifier was rejected
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeRangeError {
    /// Expected `<year>-<month>` but no `-` was found
    #[error("expected a '<year>-<month>' value")]
    MissingMonthSeparator,

    /// Expected `<start>,<end>` but no `,` was found
    #[error("expected a '<start>,<end>' range")]
    MissingRangeSeparator,

    /// A year or month component is not an integer
    #[error("{0}")]
    NotANumber(#[from] ParseIntError),

    /// Month component outside 1..=12
    #[error("month {0} is outside 1-12")]
    MonthOutOfRange(i64),

    /// The period starts before 1970-01-01T00:00:00Z
    #[error("period begins before the unix epoch")]
    BeforeEpoch,

    /// Range start is after range end
    #[error("range start is after range end")]
    ReversedRange,
}

/// Errors surfaced by the [`ExpenseService`](super::ExpenseService)
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// Description is empty
    #[error("expense description cannot be empty")]
    InvalidDescription,

    /// Amount is zero or negative
    #[error("expense amount needs to be greater than 0")]
    InvalidAmount,

    /// Occurrence time is at or before the unix epoch
    #[error("expense date needs to be after 1970-01-01T00:00:00Z")]
    InvalidOccurredAt,

    /// Id is zero or negative
    #[error("id needs to be greater than 0")]
    InvalidId,

    /// Id is well formed but has no record
    #[error("id {0} does not have a valid record")]
    UnknownId(ExpenseId),

    /// Summary modifier could not be interpreted for the requested kind
    #[error("invalid time range of '{provided_value}' due to: {cause}")]
    InvalidTimeRange {
        /// The modifier exactly as the caller supplied it
        provided_value: String,
        /// What was wrong with it
        #[source]
        cause: TimeRangeError,
    },

    /// Matching amounts add up past the largest representable total
    #[error("expense total exceeds the largest representable amount")]
    TotalOverflow,

    /// Opaque storage failure, passed through from the repository
    #[error(transparent)]
    Storage(RepositoryError),
}

impl ExpenseError {
    /// True for violations caused by caller input (400-class)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ExpenseError::InvalidDescription
                | ExpenseError::InvalidAmount
                | ExpenseError::InvalidOccurredAt
                | ExpenseError::InvalidId
                | ExpenseError::InvalidTimeRange { .. }
        )
    }

    pub(crate) fn invalid_time_range(provided_value: &str, cause: TimeRangeError) -> Self {
        ExpenseError::InvalidTimeRange {
            provided_value: provided_value.to_string(),
            cause,
        }
    }
}

impl From<RepositoryError> for ExpenseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ExpenseError::UnknownId(id),
            other => ExpenseError::Storage(other),
        }
    }
}
