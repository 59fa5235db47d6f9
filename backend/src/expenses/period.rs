//! Summary time windows
//!
//! Resolves a [`TimeRangeKind`] plus its textual modifier into a calendar
//! window and the label reported alongside the total.

use super::error::{ExpenseError, TimeRangeError};
use super::models::TimeRangeKind;
use chrono::{DateTime, Datelike, Month, Utc};

const EPOCH_YEAR: i32 = 1970;

/// A calendar month, compared by year then month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    fn of(at: &DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Parse `"<year>-<month>"`, e.g. `"2025-10"`
    fn parse(value: &str) -> Result<Self, TimeRangeError> {
        let (year, month) = value
            .split_once('-')
            .ok_or(TimeRangeError::MissingMonthSeparator)?;

        let month: i64 = month.parse()?;
        let year: i32 = year.parse()?;

        if !(1..=12).contains(&month) {
            return Err(TimeRangeError::MonthOutOfRange(month));
        }
        if year < EPOCH_YEAR {
            return Err(TimeRangeError::BeforeEpoch);
        }

        Ok(Self {
            year,
            month: month as u32,
        })
    }

    fn describe(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");
        format!("{} of {}", name, self.year)
    }
}

fn parse_year(value: &str) -> Result<i32, TimeRangeError> {
    let year: i32 = value.parse()?;
    if year < EPOCH_YEAR {
        return Err(TimeRangeError::BeforeEpoch);
    }
    Ok(year)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    All,
    Month(YearMonth),
    Year(i32),
    MonthRange(YearMonth, YearMonth),
}

/// Calendar filter and label for one summary request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SummaryWindow {
    period: Period,
    label: String,
}

impl SummaryWindow {
    /// Interpret `modifier` for `kind`, evaluating "this month/year" against `now`
    pub(crate) fn resolve(
        kind: TimeRangeKind,
        modifier: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ExpenseError> {
        let invalid = |cause| ExpenseError::invalid_time_range(modifier, cause);

        let window = match kind {
            TimeRangeKind::AllTime => Self {
                period: Period::All,
                label: "All Expenses".to_string(),
            },
            TimeRangeKind::ThisMonth => Self {
                period: Period::Month(YearMonth::of(&now)),
                label: "This Month".to_string(),
            },
            TimeRangeKind::CustomMonth => {
                let month = YearMonth::parse(modifier).map_err(invalid)?;
                Self {
                    period: Period::Month(month),
                    label: format!("Custom Month: {}", month.describe()),
                }
            }
            TimeRangeKind::ThisYear => Self {
                period: Period::Year(now.year()),
                label: "This Year".to_string(),
            },
            TimeRangeKind::CustomYear => {
                let year = parse_year(modifier).map_err(invalid)?;
                Self {
                    period: Period::Year(year),
                    label: format!("Custom Year: {}", year),
                }
            }
            TimeRangeKind::CustomMonthYearRange => {
                let (start, end) = modifier
                    .split_once(',')
                    .ok_or_else(|| invalid(TimeRangeError::MissingRangeSeparator))?;
                let start = YearMonth::parse(start).map_err(invalid)?;
                let end = YearMonth::parse(end).map_err(invalid)?;
                if start > end {
                    return Err(invalid(TimeRangeError::ReversedRange));
                }
                Self {
                    period: Period::MonthRange(start, end),
                    label: format!(
                        "Custom Range: {} to {}",
                        start.describe(),
                        end.describe()
                    ),
                }
            }
        };

        Ok(window)
    }

    /// Whether an occurrence time falls inside the window
    pub(crate) fn contains(&self, at: &DateTime<Utc>) -> bool {
        match self.period {
            Period::All => true,
            Period::Month(month) => YearMonth::of(at) == month,
            Period::Year(year) => at.year() == year,
            Period::MonthRange(start, end) => {
                let month = YearMonth::of(at);
                start <= month && month <= end
            }
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }
}
