//! Expense service
//!
//! Business rules for expenses: every mutation is validated here before it
//! reaches the repository, and summaries are computed on demand. The service
//! holds no mutable state of its own.

use super::error::ExpenseError;
use super::models::{Cents, Expense, ExpenseId, ExpenseSummary, NewExpense, TimeRangeKind};
use super::period::SummaryWindow;
use super::repository::ExpenseRepository;
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;

fn check_description(description: &str) -> Result<(), ExpenseError> {
    if description.is_empty() {
        return Err(ExpenseError::InvalidDescription);
    }
    Ok(())
}

fn check_amount(amount: Cents) -> Result<(), ExpenseError> {
    if amount <= 0 {
        return Err(ExpenseError::InvalidAmount);
    }
    Ok(())
}

fn check_occurred_at(occurred_at: &DateTime<Utc>) -> Result<(), ExpenseError> {
    // stored at whole-second precision, so judge the value as it will be kept
    if occurred_at.trunc_subsecs(0) <= DateTime::<Utc>::UNIX_EPOCH {
        return Err(ExpenseError::InvalidOccurredAt);
    }
    Ok(())
}

fn check_id(id: ExpenseId) -> Result<(), ExpenseError> {
    if id <= 0 {
        return Err(ExpenseError::InvalidId);
    }
    Ok(())
}

/// Validate the mutable fields in the fixed order description, amount, occurred_at
fn validate_fields(
    occurred_at: &DateTime<Utc>,
    description: &str,
    amount: Cents,
) -> Result<(), ExpenseError> {
    check_description(description)?;
    check_amount(amount)?;
    check_occurred_at(occurred_at)?;
    Ok(())
}

/// Expense business layer over a pluggable repository
#[derive(Clone)]
pub struct ExpenseService {
    repo: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    /// Create a service backed by the given repository
    pub fn new(repo: Arc<dyn ExpenseRepository>) -> Self {
        Self { repo }
    }

    /// Validate and persist a new expense
    ///
    /// # Returns
    /// * `Ok(Expense)` - The stored record with its assigned `id` and `created_at`
    /// * `Err(ExpenseError)` - First violated rule, or a storage failure
    pub async fn create_expense(
        &self,
        occurred_at: DateTime<Utc>,
        description: &str,
        amount: Cents,
    ) -> Result<Expense, ExpenseError> {
        validate_fields(&occurred_at, description, amount)?;

        let expense = self
            .repo
            .create(NewExpense::new(occurred_at, description, amount))
            .await?;
        Ok(expense)
    }

    /// Every stored expense
    pub async fn get_all_expenses(&self) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self.repo.get_all().await?)
    }

    /// Fetch one expense; unknown ids yield [`ExpenseError::UnknownId`]
    pub async fn get_expense_by_id(&self, id: ExpenseId) -> Result<Expense, ExpenseError> {
        check_id(id)?;
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Revalidate and replace amount, occurrence time and description
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        occurred_at: DateTime<Utc>,
        description: &str,
        amount: Cents,
    ) -> Result<(), ExpenseError> {
        check_id(id)?;
        validate_fields(&occurred_at, description, amount)?;

        self.repo
            .update(id, NewExpense::new(occurred_at, description, amount))
            .await?;
        Ok(())
    }

    /// Remove an expense by id
    pub async fn delete_expense(&self, id: ExpenseId) -> Result<(), ExpenseError> {
        check_id(id)?;
        self.repo.delete(id).await?;
        Ok(())
    }

    /// Total the expenses inside a time window, with "now" taken from the clock
    pub async fn summarize_expenses(
        &self,
        kind: TimeRangeKind,
        modifier: &str,
    ) -> Result<ExpenseSummary, ExpenseError> {
        self.summarize_expenses_at(kind, modifier, Utc::now()).await
    }

    /// Total the expenses inside a time window, evaluating relative kinds against `now`
    pub async fn summarize_expenses_at(
        &self,
        kind: TimeRangeKind,
        modifier: &str,
        now: DateTime<Utc>,
    ) -> Result<ExpenseSummary, ExpenseError> {
        let expenses = self.repo.get_all().await?;
        let window = SummaryWindow::resolve(kind, modifier, now)?;

        let total = expenses
            .iter()
            .filter(|expense| window.contains(&expense.occurred_at))
            .try_fold(0, |total: Cents, expense| total.checked_add(expense.amount))
            .ok_or(ExpenseError::TotalOverflow)?;

        Ok(ExpenseSummary {
            range_label: window.label().to_string(),
            total,
        })
    }
}
