//! Persistence-side types: the document/identifier model and the MongoDB
//! connector used by the service layer.

pub mod errors;
pub mod db;
pub mod document;

pub use document::{EntityId, JsonDocument, ID_FIELD};
