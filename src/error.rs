use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] libsql::Error),
    #[error("count query returned no count column")]
    MissingCount,
    #[error("count query returned a non-numeric count: {0}")]
    MalformedCount(String),
    #[error("row has an unreadable column: {0}")]
    MalformedRow(String),
    #[error("{0} is not supported yet")]
    NotYetSupported(&'static str),
}
