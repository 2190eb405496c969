use thiserror::Error;

/// Errors that can occur while generating or storing recipes
#[derive(Error, Debug)]
pub enum ChomptronError {
    /// Transport failure talking to the generation provider
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The provider answered, but not with a usable recipe
    #[error("{0}")]
    ProviderError(String),

    /// No API key available for the generation provider
    #[error("{0} not configured")]
    MissingCredential(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Durable storage backend rejected a read or write
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type Result<T> = std::result::Result<T, ChomptronError>;
