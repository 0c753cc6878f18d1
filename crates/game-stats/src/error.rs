//! Statistics engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Elo bucket width must be positive, got {0}")]
    InvalidBucketWidth(i32),

    #[error("Opening book error: {0}")]
    Book(#[from] chess_core::BookError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
