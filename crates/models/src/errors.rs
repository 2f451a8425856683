use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid ID")]
    InvalidId(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("{0}")]
    Db(String),
}

impl From<mongodb::error::Error> for ModelError {
    fn from(e: mongodb::error::Error) -> Self {
        ModelError::Db(e.to_string())
    }
}
