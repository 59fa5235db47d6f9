//! SQLite expense repository
//!
//! Relational backend over a `sqlx` connection pool. Row-level concurrency is
//! left to SQLite; no application locking is added here.

use super::{from_unix_seconds, record_timestamp, whole_seconds};
use crate::expenses::{Expense, ExpenseId, ExpenseRepository, NewExpense, RepositoryError};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const MIGRATION_SQL: &str = include_str!("../../migrations/001_create_expenses.sql");

/// One row of the `expenses` table
#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: i64,
    created_at: i64,
    occurred_at: i64,
    description: String,
    amount: i64,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = RepositoryError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        Ok(Expense {
            id: row.id,
            amount: row.amount,
            occurred_at: from_unix_seconds(row.occurred_at)?,
            created_at: from_unix_seconds(row.created_at)?,
            description: row.description,
        })
    }
}

/// Expense repository backed by a SQLite database
#[derive(Clone)]
pub struct SqliteExpenseRepository {
    pool: SqlitePool,
}

impl SqliteExpenseRepository {
    /// Open (creating if missing) the database file and run migrations
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, with or without a `sqlite:` prefix
    pub async fn connect(db_path: &str) -> Result<Self, RepositoryError> {
        if let Some(parent) = PathBuf::from(db_path.trim_start_matches("sqlite:")).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("failed to create database directory")?;
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .context("invalid database path")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to connect to database")?;

        info!("Connected to SQLite database at: {}", db_path);
        Self::with_pool(pool).await
    }

    /// A private in-memory database, useful for tests
    pub async fn in_memory() -> Result<Self, RepositoryError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory database options")?;

        // every connection to :memory: is a separate database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .context("failed to open in-memory database")?;

        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, running migrations first
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, RepositoryError> {
        let repo = Self { pool };
        repo.run_migrations().await?;
        Ok(repo)
    }

    async fn run_migrations(&self) -> Result<(), RepositoryError> {
        info!("Running database migrations...");
        sqlx::raw_sql(MIGRATION_SQL)
            .execute(&self.pool)
            .await
            .context("migration failed")?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepository {
    async fn get_by_id(&self, id: ExpenseId) -> Result<Expense, RepositoryError> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, created_at, occurred_at, description, amount FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to fetch expense")?;

        row.ok_or(RepositoryError::NotFound(id))?.try_into()
    }

    async fn get_all(&self) -> Result<Vec<Expense>, RepositoryError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, created_at, occurred_at, description, amount FROM expenses ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch expenses")?;

        rows.into_iter().map(Expense::try_from).collect()
    }

    async fn create(&self, mut expense: NewExpense) -> Result<Expense, RepositoryError> {
        expense.occurred_at = whole_seconds(expense.occurred_at);
        let created_at = record_timestamp();

        let result = sqlx::query(
            "INSERT INTO expenses (created_at, occurred_at, description, amount) VALUES (?, ?, ?, ?)",
        )
        .bind(created_at.timestamp())
        .bind(expense.occurred_at.timestamp())
        .bind(&expense.description)
        .bind(expense.amount)
        .execute(&self.pool)
        .await
        .context("failed to create expense")?;

        let id = result.last_insert_rowid();
        debug!("Created expense: {}", id);
        Ok(expense.into_expense(id, created_at))
    }

    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE expenses SET occurred_at = ?, description = ?, amount = ? WHERE id = ?",
        )
        .bind(expense.occurred_at.timestamp())
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("failed to update expense")?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        debug!("Updated expense: {}", id);
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("failed to delete expense")?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        debug!("Deleted expense: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    async fn seeded_repo() -> SqliteExpenseRepository {
        let repo = SqliteExpenseRepository::in_memory().await.unwrap();
        for (occurred_at, description, amount) in [
            (1761231600, "new hairdryer", 11999),
            (1761148800, "oat breakfast", 1399),
            (1761073200, "cab to train station", 2700),
            (1761001200, "late dinner with client", 6289),
        ] {
            repo.create(NewExpense::new(
                DateTime::from_timestamp(occurred_at, 0).unwrap(),
                description,
                amount,
            ))
            .await
            .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = seeded_repo().await;

        let expense = repo.get_by_id(2).await.unwrap();
        assert_eq!(expense.id, 2);
        assert_eq!(expense.description, "oat breakfast");
        assert_eq!(expense.amount, 1399);
        assert_eq!(expense.occurred_at.timestamp(), 1761148800);

        assert!(matches!(
            repo.get_by_id(100).await,
            Err(RepositoryError::NotFound(100))
        ));
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let repo = seeded_repo().await;

        let expenses = repo.get_all().await.unwrap();
        let ids: Vec<_> = expenses.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(expenses[0].description, "new hairdryer");
    }

    #[tokio::test]
    async fn test_get_all_empty_table() {
        let repo = SqliteExpenseRepository::in_memory().await.unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_stamps_created_at() {
        let repo = SqliteExpenseRepository::in_memory().await.unwrap();
        let before = Utc::now().timestamp();

        let created = repo
            .create(NewExpense::new(
                DateTime::from_timestamp(1760810400, 0).unwrap(),
                "new coffee machine for headquarters",
                18988,
            ))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert!(created.created_at.timestamp() >= before);

        let stored = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = seeded_repo().await;
        let original = repo.get_by_id(3).await.unwrap();

        repo.update(
            3,
            NewExpense::new(
                DateTime::from_timestamp(1760882400, 0).unwrap(),
                "cab to lunch",
                2560,
            ),
        )
        .await
        .unwrap();

        let updated = repo.get_by_id(3).await.unwrap();
        assert_eq!(updated.description, "cab to lunch");
        assert_eq!(updated.amount, 2560);
        assert_eq!(updated.created_at, original.created_at);

        repo.delete(3).await.unwrap();
        assert!(matches!(
            repo.get_by_id(3).await,
            Err(RepositoryError::NotFound(3))
        ));
        assert!(matches!(
            repo.delete(3).await,
            Err(RepositoryError::NotFound(3))
        ));
        assert!(matches!(
            repo.update(3, NewExpense::new(updated.occurred_at, "x", 1))
                .await,
            Err(RepositoryError::NotFound(3))
        ));
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.db");
        let path = path.to_str().unwrap();

        {
            let repo = SqliteExpenseRepository::connect(path).await.unwrap();
            repo.create(NewExpense::new(
                DateTime::from_timestamp(1760810400, 0).unwrap(),
                "persisted",
                100,
            ))
            .await
            .unwrap();
            repo.pool().close().await;
        }

        let reopened = SqliteExpenseRepository::connect(path).await.unwrap();
        let expenses = reopened.get_all().await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].description, "persisted");
    }
}
