//! Auth module: login/register against plaintext credential records stored in
//! the document collection, plus HS256 session tokens.

pub mod domain;
pub mod errors;
pub mod service;

pub use service::AuthService;
