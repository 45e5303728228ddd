use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: Uuid,
    },

    #[error("conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("transient storage failure: {message}")]
    Transient {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
