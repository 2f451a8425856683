//! Service layer: request-independent business operations on top of a
//! document store.
//! - `storage` abstracts the document collection (MongoDB or in-memory).
//! - `people` holds the CRUD workflows.
//! - `auth` holds login/register and token handling.

pub mod errors;
pub mod storage;
pub mod people;
pub mod auth;
