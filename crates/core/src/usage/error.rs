use thiserror::Error;

/// Errors from the counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Counter API error: {0}")]
    Api(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid counter value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
