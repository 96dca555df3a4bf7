use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Recovery error: {0}")]
    Recovery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Fatal errors end a run in the failed state; everything else degrades.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Persistence(_) | Error::Recovery(_) | Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
