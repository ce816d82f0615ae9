// ============================================================================
// Repository Module - CRUD access to the three domain records
// ============================================================================
//
// Structure:
// - memory    - InMemoryRepository<T>, ordered by id
// - postgres  - sqlx-backed repositories plus schema bootstrap
// - seed      - fixed sample catalogue
//
// ============================================================================

mod memory;
mod postgres;
mod seed;

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::models::Entity;

pub use memory::InMemoryRepository;
pub use postgres::{ensure_schema, PgAuthorRepository, PgProductCategoryRepository, PgProductRepository, PgStoreProbe};
pub use seed::seed_sample_data;

/// Generic CRUD over an entity keyed by `i32`
#[async_trait]
pub trait CrudRepository<T: Entity>: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepositoryError>;

    /// All records ordered by id
    async fn find_all(&self) -> Result<Vec<T>, RepositoryError>;

    /// Insert or replace by id
    async fn save(&self, entity: T) -> Result<T, RepositoryError>;

    /// Returns true when a record was removed
    async fn delete_by_id(&self, id: i32) -> Result<bool, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;

    async fn exists_by_id(&self, id: i32) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Cheap liveness query against whatever backs the repositories
#[async_trait]
pub trait StoreProbe: Send + Sync {
    /// Backend name reported in health details
    fn backend(&self) -> &str;

    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Probe for the in-memory backend; it cannot fail
pub struct MemoryStoreProbe;

#[async_trait]
impl StoreProbe for MemoryStoreProbe {
    fn backend(&self) -> &str {
        "in-memory"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
