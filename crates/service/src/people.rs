use std::sync::Arc;

use tracing::{info, instrument};

use models::{EntityId, JsonDocument, ID_FIELD};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// CRUD workflows over the people collection. Each call is one logical store
/// operation; create and update read the document back because the store
/// does not return it from the write.
#[derive(Clone)]
pub struct PeopleService {
    store: Arc<dyn DocumentStore>,
}

impl PeopleService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// All documents, unpaginated.
    pub async fn list(&self) -> Result<Vec<JsonDocument>, ServiceError> {
        self.store.find_all().await
    }

    /// Insert a document and return it as stored. A client-supplied `_id` is
    /// dropped so the store always assigns it.
    #[instrument(skip(self, doc), fields(fields = doc.len()))]
    pub async fn create(&self, mut doc: JsonDocument) -> Result<JsonDocument, ServiceError> {
        doc.remove(ID_FIELD);
        let id = self.store.insert_one(doc).await?;
        let stored = self.store.find_by_id(id).await?.ok_or_else(|| {
            ServiceError::Unreadable(format!("inserted document {id} could not be read back"))
        })?;
        info!(%id, "document_created");
        Ok(stored)
    }

    /// Merge `fields` into the document and return the result. The id is
    /// validated before the store is touched.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, raw_id: &str, mut fields: JsonDocument) -> Result<JsonDocument, ServiceError> {
        let id = EntityId::parse(raw_id)?;
        fields.remove(ID_FIELD);
        if !fields.is_empty() {
            self.store.set_fields(id, fields).await?;
        }
        let updated = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("document"))?;
        info!(%id, "document_updated");
        Ok(updated)
    }

    /// Returns the deleted count: 1, or 0 when nothing matched.
    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<u64, ServiceError> {
        let id = EntityId::parse(raw_id)?;
        let deleted = self.store.delete_one(id).await?;
        info!(%id, deleted, "document_deleted");
        Ok(deleted)
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        self.store.ping().await
    }
}
