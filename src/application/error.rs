use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
