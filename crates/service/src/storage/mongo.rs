use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;

use models::db::Database;
use models::document::{to_bson_document, to_json_document};
use models::{EntityId, JsonDocument};

use crate::errors::ServiceError;
use crate::storage::DocumentStore;

/// MongoDB-backed collection.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        let collection = db.collection();
        Self { db, collection }
    }
}

fn by_id(id: EntityId) -> Document {
    doc! { "_id": id.object_id() }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_all(&self) -> Result<Vec<JsonDocument>, ServiceError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(to_json_document).collect())
    }

    async fn find_by_id(&self, id: EntityId) -> Result<Option<JsonDocument>, ServiceError> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(to_json_document))
    }

    async fn find_one_by_fields(&self, fields: &[(&str, &str)]) -> Result<Option<JsonDocument>, ServiceError> {
        let mut filter = Document::new();
        for (k, v) in fields {
            filter.insert(*k, *v);
        }
        let found = self.collection.find_one(filter).await?;
        Ok(found.map(to_json_document))
    }

    async fn insert_one(&self, doc: JsonDocument) -> Result<EntityId, ServiceError> {
        let encoded = to_bson_document(&doc)?;
        let res = self.collection.insert_one(encoded).await?;
        res.inserted_id
            .as_object_id()
            .map(EntityId::from)
            .ok_or_else(|| ServiceError::Db(format!("unexpected inserted id {}", res.inserted_id)))
    }

    async fn set_fields(&self, id: EntityId, fields: JsonDocument) -> Result<u64, ServiceError> {
        let encoded = to_bson_document(&fields)?;
        let res = self.collection.update_one(by_id(id), doc! { "$set": encoded }).await?;
        Ok(res.matched_count)
    }

    async fn delete_one(&self, id: EntityId) -> Result<u64, ServiceError> {
        let res = self.collection.delete_one(by_id(id)).await?;
        Ok(res.deleted_count)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        self.db.ping().await?;
        Ok(())
    }
}
