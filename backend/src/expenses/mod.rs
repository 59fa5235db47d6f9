//! Expense domain
//!
//! Data model, repository contract, and the service enforcing business rules
//! and computing summaries.

pub mod error;
pub mod models;
mod period;
pub mod repository;
pub mod service;

pub use error::{ExpenseError, RepositoryError, TimeRangeError};
pub use models::{Cents, Expense, ExpenseId, ExpenseSummary, NewExpense, TimeRangeKind};
pub use repository::ExpenseRepository;
pub use service::ExpenseService;
