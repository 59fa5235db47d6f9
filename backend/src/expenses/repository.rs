//! Repository abstraction
//!
//! Storage-agnostic CRUD contract consumed by the expense service. Concrete
//! backends live in [`crate::storage`] and are chosen once at startup.

use super::error::RepositoryError;
use super::models::{Expense, ExpenseId, NewExpense};
use async_trait::async_trait;

/// Persistence interface for expenses
///
/// Implementations own `id` assignment (monotonically increasing per
/// repository instance) and `created_at` stamping. Ids passed in are assumed
/// to be positive; callers validate them.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Fetch one record, or [`RepositoryError::NotFound`]
    async fn get_by_id(&self, id: ExpenseId) -> Result<Expense, RepositoryError>;

    /// Fetch every record, in ascending id order
    async fn get_all(&self) -> Result<Vec<Expense>, RepositoryError>;

    /// Persist a new record, assigning its `id` and `created_at`
    async fn create(&self, expense: NewExpense) -> Result<Expense, RepositoryError>;

    /// Replace amount, occurrence time and description of an existing record
    ///
    /// `id` and `created_at` are never changed.
    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), RepositoryError>;

    /// Remove a record, or [`RepositoryError::NotFound`]
    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError>;
}
