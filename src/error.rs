//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The storage backend accepted the object but produced no public URL.
    #[error("Storage returned no URL for key: {0}")]
    StorageNoUrl(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image generation provider error: {0}")]
    AiProvider(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Database(e.to_string())
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(format!("Connection pool error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
