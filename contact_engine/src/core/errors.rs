// @file: contact_engine/src/core/errors.rs
// @description: Error types for ingestion, validation, persistence, transport and the service layer.
// @author: LAS.

use thiserror::Error;


//
// INGESTION
//

#[derive(Debug, Error)]
pub enum IngestionError {
    /// The stream could not be read at all. Per-row problems never surface here.
    #[error("failed to read CSV stream: {0}")]
    Unreadable(#[source] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("invalid date of birth '{0}'")]
    InvalidDate(String),

    #[error("invalid married flag '{0}'")]
    InvalidMarried(String),

    #[error("invalid salary '{0}'")]
    InvalidSalary(String),
}


//
// VALIDATION
//

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .errors.join(", "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}


//
// PERSISTENCE
//

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("contact {0} not found")]
    NotFound(i64),

    #[error("storage failure: {0}")]
    Storage(String),
}


//
// TRANSPORT
//

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("socket is closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),
}


//
// SERVICE
//

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("file is empty or was not provided")]
    EmptyFile,

    #[error("only .csv files are accepted, got '{0}'")]
    InvalidExtension(String),

    #[error("file exceeds the {limit} byte upload limit")]
    FileTooLarge { limit: usize },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
