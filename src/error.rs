use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Access denied: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for RegistryError {
    fn from(err: rocksdb::Error) -> Self {
        RegistryError::InternalError(Box::new(err))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::InternalError(Box::new(err))
    }
}

impl RegistryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RegistryError::ValidationError(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        RegistryError::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        RegistryError::Conflict(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
