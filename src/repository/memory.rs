use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::CrudRepository;
use crate::error::RepositoryError;
use crate::models::Entity;

/// Map-backed repository; iteration order is id order
pub struct InMemoryRepository<T: Entity> {
    records: RwLock<BTreeMap<i32, T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id(), r)).collect()),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> CrudRepository<T> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepositoryError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn save(&self, entity: T) -> Result<T, RepositoryError> {
        tracing::debug!(entity = T::NAME, id = entity.id(), "Saving record");
        self.records.write().await.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.records.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;

    fn author(id: i32, name: &str) -> Author {
        Author { id, name: name.to_string() }
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let repo = InMemoryRepository::<Author>::new();
        repo.save(author(1, "Karthikeyan")).await.unwrap();

        assert_eq!(repo.find_by_id(1).await.unwrap(), Some(author(1, "Karthikeyan")));
        assert_eq!(repo.find_by_id(2).await.unwrap(), None);
        assert!(repo.exists_by_id(1).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_replaces_existing_id() {
        let repo = InMemoryRepository::with_records([author(1, "Pascal")]);
        repo.save(author(1, "Thomas")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().name, "Thomas");
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryRepository::with_records([author(3, "c"), author(1, "a"), author(2, "b")]);
        let ids: Vec<i32> = repo.find_all().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let repo = InMemoryRepository::with_records([author(1, "a")]);

        assert!(repo.delete_by_id(1).await.unwrap());
        assert!(!repo.delete_by_id(1).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
