use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The write went through but the stored document could not be read back.
    #[error("{0}")]
    Unreadable(String),
    #[error("{0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::InvalidId(_) | ModelError::Encoding(_) => ServiceError::Validation(e.to_string()),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(e: mongodb::error::Error) -> Self {
        ServiceError::Db(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_becomes_validation_error() {
        let err: ServiceError = ModelError::InvalidId("nope".into()).into();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Invalid ID"));
    }

    #[test]
    fn db_message_is_kept_verbatim() {
        let err: ServiceError = ModelError::Db("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
