//! Mapping between diesel failures and the core error taxonomy.

use avisos_core::errors::{DatabaseError, Error};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Record not found")]
    NotFound,

    #[error("Database query failed: {0}")]
    Query(diesel::result::Error),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<diesel::result::Error> for StorageError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => StorageError::NotFound,
            other => StorageError::Query(other),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Error::NotFound("record not found".to_string()),
            StorageError::Query(inner) => {
                Error::Database(DatabaseError::QueryFailed(inner.to_string()))
            }
            StorageError::Connection(message) => Error::Database(DatabaseError::Pool(message)),
        }
    }
}
