use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("repository connection error: {0}")]
    RepositoryConnect(String),
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("revision range error: {0}")]
    RevisionRange(String),
    #[error("log retrieval error: {0}")]
    LogRetrieval(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
