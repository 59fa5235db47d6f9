//! Storage backends
//!
//! Concrete [`ExpenseRepository`] implementations. The backend is chosen once,
//! at startup, from [`StorageConfig`].

pub mod document;
pub mod memory;
pub mod sqlite;

pub use document::DocumentExpenseRepository;
pub use memory::MemoryExpenseRepository;
pub use sqlite::SqliteExpenseRepository;

use crate::config::{StorageBackend, StorageConfig};
use crate::expenses::{ExpenseRepository, RepositoryError};
use anyhow::anyhow;
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use tracing::info;

/// Build the repository selected by the configuration
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn ExpenseRepository>, RepositoryError> {
    info!("Using {} storage backend", config.backend.as_str());

    let repo: Arc<dyn ExpenseRepository> = match config.backend {
        StorageBackend::Sqlite => Arc::new(SqliteExpenseRepository::connect(&config.db_path).await?),
        StorageBackend::Memory => Arc::new(MemoryExpenseRepository::new()),
        StorageBackend::Document => {
            Arc::new(DocumentExpenseRepository::open(&config.document_path).await?)
        }
    };

    Ok(repo)
}

/// Current time at the precision every backend can store
pub(crate) fn record_timestamp() -> DateTime<Utc> {
    whole_seconds(Utc::now())
}

pub(crate) fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(0)
}

pub(crate) fn from_unix_seconds(secs: i64) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| anyhow!("stored timestamp {} is out of range", secs).into())
}
