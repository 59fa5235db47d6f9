//! In-memory expense repository
//!
//! Keeps records in a `BTreeMap` behind a reader/writer lock. Used for tests
//! and for running the server without a database.

use super::record_timestamp;
use crate::expenses::{Expense, ExpenseId, ExpenseRepository, NewExpense, RepositoryError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryStore {
    last_id: ExpenseId,
    records: BTreeMap<ExpenseId, Expense>,
}

/// Expense repository held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryExpenseRepository {
    store: RwLock<MemoryStore>,
}

impl MemoryExpenseRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseRepository for MemoryExpenseRepository {
    async fn get_by_id(&self, id: ExpenseId) -> Result<Expense, RepositoryError> {
        let store = self.store.read().await;
        store
            .records
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn get_all(&self) -> Result<Vec<Expense>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.records.values().cloned().collect())
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, RepositoryError> {
        let mut store = self.store.write().await;
        // ids are never reused, even after deletes
        store.last_id += 1;
        let expense = expense.into_expense(store.last_id, record_timestamp());
        store.records.insert(expense.id, expense.clone());

        debug!("Created expense: {}", expense.id);
        Ok(expense)
    }

    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        let record = store
            .records
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;

        record.amount = expense.amount;
        record.occurred_at = expense.occurred_at;
        record.description = expense.description;

        debug!("Updated expense: {}", id);
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store
            .records
            .remove(&id)
            .ok_or(RepositoryError::NotFound(id))?;

        debug!("Deleted expense: {}", id);
        Ok(())
    }
}
