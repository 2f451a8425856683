use std::fmt;

use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// Untyped entity as exchanged with clients: any JSON object.
pub type JsonDocument = Map<String, Value>;

/// Field holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Store-assigned identifier of a document (a MongoDB ObjectId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(ObjectId);

impl EntityId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Accepts exactly 24 hex characters.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| ModelError::InvalidId(raw.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl From<ObjectId> for EntityId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Encode a client document as BSON for storage.
pub fn to_bson_document(doc: &JsonDocument) -> Result<Document, ModelError> {
    bson::to_document(doc).map_err(|e| ModelError::Encoding(e.to_string()))
}

/// Decode a stored document for a JSON response. ObjectIds become their hex
/// string; everything else uses relaxed extended JSON.
pub fn to_json_document(doc: Document) -> JsonDocument {
    doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect()
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(to_json_document(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn parse_accepts_24_hex_chars() {
        let id = EntityId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for raw in ["", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "65a1f0c2e4b0a1b2c3d4e5f6a", "65a1f0c2e4b0a1b2c3d4e5f"] {
            let err = EntityId::parse(raw).unwrap_err();
            assert!(matches!(err, ModelError::InvalidId(_)), "{raw:?} should be rejected");
            assert_eq!(err.to_string(), "Invalid ID");
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(EntityId::generate(), EntityId::generate());
    }

    #[test]
    fn object_ids_render_as_hex_strings() {
        let oid = ObjectId::new();
        let stored = doc! {
            "_id": oid,
            "name": "Ada",
            "age": 36_i64,
            "tags": ["math", { "ref": oid }],
            "address": { "city": "London" },
        };
        let json = Value::Object(to_json_document(stored));
        assert_eq!(
            json,
            json!({
                "_id": oid.to_hex(),
                "name": "Ada",
                "age": 36,
                "tags": ["math", { "ref": oid.to_hex() }],
                "address": { "city": "London" },
            })
        );
    }

    #[test]
    fn client_documents_encode_to_bson() {
        let input = json!({ "name": "Ada", "active": true, "score": 1.5, "nested": { "a": [1, 2] } });
        let Value::Object(map) = input else { unreachable!() };
        let encoded = to_bson_document(&map).unwrap();
        assert_eq!(encoded.get_str("name").unwrap(), "Ada");
        assert!(encoded.get_bool("active").unwrap());
        assert_eq!(encoded.get_document("nested").unwrap().get_array("a").unwrap().len(), 2);
    }
}
