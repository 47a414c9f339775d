use thiserror::Error;

/// Failures of the storage collaborator behind the registry.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Reasons a link could not be created.
#[derive(Debug, Clone, Error)]
pub enum CreateError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("validity must be between 1 and 1440 minutes, got {0}")]
    InvalidValidity(i64),
    #[error("short code may only contain letters, digits, '-' and '_': '{0}'")]
    InvalidCodeFormat(String),
    #[error("short code already taken: {0}")]
    CodeTaken(String),
    #[error("could not generate a free short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons a short code could not be resolved or deleted.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("short code expired: {0}")]
    Expired(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
