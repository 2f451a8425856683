use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use models::{EntityId, JsonDocument, ID_FIELD};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// In-process collection with MongoDB-like semantics. Keeps insertion
/// order and counts every call so tests can assert that nothing reached the
/// store.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<JsonDocument>>,
    calls: AtomicUsize,
    failure: Option<String>,
    unreadable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::default() }
    }

    /// A store that accepts writes but never finds a document by id.
    pub fn unreadable() -> Self {
        Self { unreadable: true, ..Self::default() }
    }

    /// Number of operations issued against this store so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(msg) => Err(ServiceError::Db(msg.clone())),
            None => Ok(()),
        }
    }
}

fn has_id(doc: &JsonDocument, id: EntityId) -> bool {
    matches!(doc.get(ID_FIELD), Some(Value::String(s)) if *s == id.to_hex())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<JsonDocument>, ServiceError> {
        self.begin()?;
        Ok(self.docs.read().await.clone())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<JsonDocument>, ServiceError> {
        self.begin()?;
        if self.unreadable {
            return Ok(None);
        }
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| has_id(d, id)).cloned())
    }

    async fn find_one_by_fields(&self, fields: &[(&str, &str)]) -> Result<Option<JsonDocument>, ServiceError> {
        self.begin()?;
        let docs = self.docs.read().await;
        let found = docs.iter().find(|d| {
            fields
                .iter()
                .all(|(k, v)| matches!(d.get(*k), Some(Value::String(s)) if s == v))
        });
        Ok(found.cloned())
    }

    async fn insert_one(&self, mut doc: JsonDocument) -> Result<EntityId, ServiceError> {
        self.begin()?;
        let id = EntityId::generate();
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
        self.docs.write().await.push(doc);
        Ok(id)
    }

    async fn set_fields(&self, id: EntityId, fields: JsonDocument) -> Result<u64, ServiceError> {
        self.begin()?;
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|d| has_id(d, id)) {
            Some(doc) => {
                doc.extend(fields);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: EntityId) -> Result<u64, ServiceError> {
        self.begin()?;
        let mut docs = self.docs.write().await;
        match docs.iter().position(|d| has_id(d, id)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.begin()
    }
}
