use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

pub type AppResult<T> = Result<T, AppError>;
