use thiserror::Error;

/// Failures raised below the service layer.
///
/// Absence of a row is not an error: repositories and services report it as
/// `None` / `false` and the API layer decides how to surface it.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Connection pool error: {0}")]
    Pool(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}
