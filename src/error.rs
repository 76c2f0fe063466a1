use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Invalid username: must not be empty")]
    InvalidUsername,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unrecognized payment method: {0}")]
    UnrecognizedPaymentMethod(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("No user is logged in")]
    NotLoggedIn,
    #[error("A session is already active for {0}")]
    SessionActive(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
