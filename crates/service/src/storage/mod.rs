//! Storage abstraction for the service layer.
//!
//! A single untyped collection holds both entity documents and credential
//! records. `mongo` talks to MongoDB; `memory` keeps everything in process
//! and backs the test suites.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use models::{EntityId, JsonDocument};

use crate::errors::ServiceError;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Operations the handlers need from the document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document, empty filter, store order.
    async fn find_all(&self) -> Result<Vec<JsonDocument>, ServiceError>;

    async fn find_by_id(&self, id: EntityId) -> Result<Option<JsonDocument>, ServiceError>;

    /// First document whose string fields equal all of `fields`.
    async fn find_one_by_fields(&self, fields: &[(&str, &str)]) -> Result<Option<JsonDocument>, ServiceError>;

    /// Insert as-is; the store assigns the id.
    async fn insert_one(&self, doc: JsonDocument) -> Result<EntityId, ServiceError>;

    /// Shallow field merge (`$set`). Returns the number of matched documents.
    async fn set_fields(&self, id: EntityId, fields: JsonDocument) -> Result<u64, ServiceError>;

    /// Returns the number of removed documents (0 or 1).
    async fn delete_one(&self, id: EntityId) -> Result<u64, ServiceError>;

    async fn ping(&self) -> Result<(), ServiceError>;
}
