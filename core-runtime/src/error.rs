use thiserror::Error;

/// Errors raised while configuring the player runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings or logging configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(format!("Invalid settings JSON: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
