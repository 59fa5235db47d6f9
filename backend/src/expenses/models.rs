//! Expense data models
//!
//! Defines the stored expense record, the insert payload handed to
//! repositories, and the derived summary returned by the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for an expense, assigned by the repository
pub type ExpenseId = i64;

/// Monetary amount in minor currency units (cents)
pub type Cents = i64;

/// A single recorded transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Repository-assigned identifier, immutable once set
    pub id: ExpenseId,
    /// Amount in cents, always positive for persisted records
    pub amount: Cents,
    /// When the expense happened
    pub occurred_at: DateTime<Utc>,
    /// When the record was persisted (set by the repository)
    pub created_at: DateTime<Utc>,
    /// What the transaction was
    pub description: String,
}

/// Expense fields supplied by callers
///
/// Repositories turn this into an [`Expense`] by assigning `id` and
/// `created_at`; updates reuse it for the replaceable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Amount in cents
    pub amount: Cents,
    /// When the expense happened
    pub occurred_at: DateTime<Utc>,
    /// What the transaction was
    pub description: String,
}

impl NewExpense {
    /// Build the insert payload
    pub fn new(occurred_at: DateTime<Utc>, description: impl Into<String>, amount: Cents) -> Self {
        Self {
            amount,
            occurred_at,
            description: description.into(),
        }
    }

    /// Attach repository-assigned fields, producing the stored record
    pub fn into_expense(self, id: ExpenseId, created_at: DateTime<Utc>) -> Expense {
        Expense {
            id,
            amount: self.amount,
            occurred_at: self.occurred_at,
            created_at,
            description: self.description,
        }
    }
}

/// Computed total over a filtered set of expenses. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    /// Human-readable description of the summarized window
    pub range_label: String,
    /// Sum of matching amounts, 0 when nothing matches
    pub total: Cents,
}

/// Which date filter a summary uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeRangeKind {
    /// Every stored expense
    #[default]
    AllTime,
    /// Current calendar month (UTC)
    ThisMonth,
    /// A specific month, modifier `"YYYY-MM"`
    CustomMonth,
    /// Current calendar year (UTC)
    ThisYear,
    /// A specific year, modifier `"YYYY"`
    CustomYear,
    /// Inclusive month range, modifier `"YYYY-MM,YYYY-MM"`
    #[serde(rename = "custom-range")]
    CustomMonthYearRange,
}

impl TimeRangeKind {
    /// Every kind, in wire-documentation order
    pub const ALL: [TimeRangeKind; 6] = [
        TimeRangeKind::AllTime,
        TimeRangeKind::ThisMonth,
        TimeRangeKind::CustomMonth,
        TimeRangeKind::ThisYear,
        TimeRangeKind::CustomYear,
        TimeRangeKind::CustomMonthYearRange,
    ];

    /// Look a kind up by its wire name
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Wire name of the kind, as used in the summary query string
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRangeKind::AllTime => "all-time",
            TimeRangeKind::ThisMonth => "this-month",
            TimeRangeKind::CustomMonth => "custom-month",
            TimeRangeKind::ThisYear => "this-year",
            TimeRangeKind::CustomYear => "custom-year",
            TimeRangeKind::CustomMonthYearRange => "custom-range",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_into_expense_keeps_caller_fields() {
        let occurred_at = Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap();
        let created_at = Utc.with_ymd_and_hms(2025, 10, 16, 8, 30, 0).unwrap();

        let expense = NewExpense::new(occurred_at, "lunch", 1250).into_expense(7, created_at);

        assert_eq!(expense.id, 7);
        assert_eq!(expense.amount, 1250);
        assert_eq!(expense.occurred_at, occurred_at);
        assert_eq!(expense.created_at, created_at);
        assert_eq!(expense.description, "lunch");
    }

    #[test]
    fn test_time_range_kind_wire_names() {
        for kind in TimeRangeKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(TimeRangeKind::from_wire(kind.as_str()), Some(kind));
        }
        assert_eq!(TimeRangeKind::default(), TimeRangeKind::AllTime);
    }
}
