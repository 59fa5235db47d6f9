//! Document collection expense repository
//!
//! Stores each expense as a flat JSON document inside a versioned collection
//! file. The collection is loaded once on open and rewritten after every
//! mutation while the write lock is held.

use super::{from_unix_seconds, record_timestamp, whole_seconds};
use crate::expenses::{Expense, ExpenseId, ExpenseRepository, NewExpense, RepositoryError};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

const COLLECTION_VERSION: u32 = 1;

/// One expense as stored in the collection, timestamps in unix seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExpenseDocument {
    id: ExpenseId,
    created_at: i64,
    occurred_at: i64,
    description: String,
    amount: i64,
}

impl ExpenseDocument {
    fn from_expense(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            created_at: expense.created_at.timestamp(),
            occurred_at: expense.occurred_at.timestamp(),
            description: expense.description.clone(),
            amount: expense.amount,
        }
    }

    fn to_expense(&self) -> Result<Expense, RepositoryError> {
        Ok(Expense {
            id: self.id,
            amount: self.amount,
            occurred_at: from_unix_seconds(self.occurred_at)?,
            created_at: from_unix_seconds(self.created_at)?,
            description: self.description.clone(),
        })
    }
}

/// On-disk collection layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ExpenseCollection {
    /// Collection format version (for future migration support)
    version: u32,
    /// Highest id ever assigned; ids are not reused after deletes
    last_id: ExpenseId,
    /// Documents in ascending id order
    documents: Vec<ExpenseDocument>,
}

impl ExpenseCollection {
    fn empty() -> Self {
        Self {
            version: COLLECTION_VERSION,
            ..Self::default()
        }
    }

    fn position(&self, id: ExpenseId) -> Result<usize, RepositoryError> {
        self.documents
            .binary_search_by_key(&id, |doc| doc.id)
            .map_err(|_| RepositoryError::NotFound(id))
    }
}

/// Expense repository persisted as a JSON document collection
pub struct DocumentExpenseRepository {
    path: PathBuf,
    collection: RwLock<ExpenseCollection>,
}

impl DocumentExpenseRepository {
    /// Open the collection at `path`, starting empty if the file does not exist
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let collection = Self::load(&path).await?;

        info!(
            "Opened expense collection at {} ({} documents)",
            path.display(),
            collection.documents.len()
        );

        Ok(Self {
            path,
            collection: RwLock::new(collection),
        })
    }

    async fn load(path: &Path) -> Result<ExpenseCollection, RepositoryError> {
        if !fs::try_exists(path).await.context("failed to stat collection file")? {
            return Ok(ExpenseCollection::empty());
        }

        let json = fs::read_to_string(path)
            .await
            .context("failed to read collection file")?;
        let collection: ExpenseCollection =
            serde_json::from_str(&json).context("failed to parse collection file")?;

        if collection.version != COLLECTION_VERSION {
            return Err(anyhow!("unsupported collection version: {}", collection.version).into());
        }

        Ok(collection)
    }

    async fn save(&self, collection: &ExpenseCollection) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .context("failed to create collection directory")?;
            }
        }

        let json =
            serde_json::to_string_pretty(collection).context("failed to encode collection")?;
        fs::write(&self.path, json)
            .await
            .context("failed to write collection file")?;
        Ok(())
    }

    /// Location of the collection file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExpenseRepository for DocumentExpenseRepository {
    async fn get_by_id(&self, id: ExpenseId) -> Result<Expense, RepositoryError> {
        let collection = self.collection.read().await;
        let index = collection.position(id)?;
        collection.documents[index].to_expense()
    }

    async fn get_all(&self) -> Result<Vec<Expense>, RepositoryError> {
        let collection = self.collection.read().await;
        collection
            .documents
            .iter()
            .map(ExpenseDocument::to_expense)
            .collect()
    }

    async fn create(&self, mut expense: NewExpense) -> Result<Expense, RepositoryError> {
        expense.occurred_at = whole_seconds(expense.occurred_at);
        let mut collection = self.collection.write().await;

        let mut staged = collection.clone();
        staged.last_id += 1;
        let expense = expense.into_expense(staged.last_id, record_timestamp());
        staged.documents.push(ExpenseDocument::from_expense(&expense));

        self.save(&staged).await?;
        *collection = staged;

        debug!("Created expense document: {}", expense.id);
        Ok(expense)
    }

    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), RepositoryError> {
        let mut collection = self.collection.write().await;
        let index = collection.position(id)?;

        let mut staged = collection.clone();
        let document = &mut staged.documents[index];
        document.amount = expense.amount;
        document.occurred_at = expense.occurred_at.timestamp();
        document.description = expense.description;

        self.save(&staged).await?;
        *collection = staged;

        debug!("Updated expense document: {}", id);
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let mut collection = self.collection.write().await;
        let index = collection.position(id)?;

        let mut staged = collection.clone();
        staged.documents.remove(index);

        self.save(&staged).await?;
        *collection = staged;

        debug!("Deleted expense document: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn sample(description: &str, amount: i64) -> NewExpense {
        NewExpense::new(
            Utc.with_ymd_and_hms(2025, 10, 18, 13, 0, 0).unwrap(),
            description,
            amount,
        )
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let repo = DocumentExpenseRepository::open(dir.path().join("expenses.json"))
            .await
            .unwrap();
        assert!(repo.get_all().await.unwrap().is_empty());
        // nothing is written until the first mutation
        assert!(!repo.path().exists());
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("expenses.json");

        let created = {
            let repo = DocumentExpenseRepository::open(&path).await.unwrap();
            let first = repo.create(sample("dinner out with friends", 8929)).await.unwrap();
            repo.create(sample("coffee for office breakfast", 7800))
                .await
                .unwrap();
            repo.delete(2).await.unwrap();
            first
        };

        let reopened = DocumentExpenseRepository::open(&path).await.unwrap();
        let all = reopened.get_all().await.unwrap();
        assert_eq!(all, vec![created]);

        // deleted id 2 is not handed out again
        let next = reopened.create(sample("bagels", 4810)).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn test_flat_document_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        let repo = DocumentExpenseRepository::open(&path).await.unwrap();
        let created = repo.create(sample("bagels", 4810)).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        let doc = &raw["documents"][0];
        assert_eq!(doc["id"], created.id);
        assert_eq!(doc["amount"], 4810);
        assert_eq!(doc["description"], "bagels");
        assert_eq!(doc["occurred_at"], created.occurred_at.timestamp());
        assert_eq!(doc["created_at"], created.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_update_and_missing_ids() {
        let dir = TempDir::new().unwrap();
        let repo = DocumentExpenseRepository::open(dir.path().join("expenses.json"))
            .await
            .unwrap();
        let created = repo.create(sample("a", 1)).await.unwrap();

        repo.update(created.id, sample("b", 2)).await.unwrap();
        let updated = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(updated.description, "b");
        assert_eq!(updated.amount, 2);
        assert_eq!(updated.created_at, created.created_at);

        assert!(matches!(
            repo.get_by_id(9).await,
            Err(RepositoryError::NotFound(9))
        ));
        assert!(matches!(
            repo.update(9, sample("c", 3)).await,
            Err(RepositoryError::NotFound(9))
        ));
        assert!(matches!(
            repo.delete(9).await,
            Err(RepositoryError::NotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        std::fs::write(&path, r#"{"version": 7, "last_id": 0, "documents": []}"#).unwrap();

        let result = DocumentExpenseRepository::open(&path).await;
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        std::fs::write(&path, "not json").unwrap();

        let result = DocumentExpenseRepository::open(&path).await;
        assert!(matches!(result, Err(RepositoryError::Storage(_))));
    }

    #[tokio::test]
    async fn test_sub_second_occurrence_is_truncated() {
        let dir = TempDir::new().unwrap();
        let repo = DocumentExpenseRepository::open(dir.path().join("expenses.json"))
            .await
            .unwrap();
        let occurred_at = DateTime::from_timestamp(1760792400, 500_000_000).unwrap();

        let created = repo
            .create(NewExpense::new(occurred_at, "coffee", 350))
            .await
            .unwrap();
        let stored = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(stored.occurred_at.timestamp(), 1760792400);
        assert_eq!(stored, created);
    }
}
