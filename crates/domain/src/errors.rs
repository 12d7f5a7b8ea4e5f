use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Box {0} is full")]
    BoxFull(usize),

    #[error("Malformed save data: {0}")]
    MalformedImport(String),

    #[error("No trainer session is active")]
    NoActiveSession,

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
