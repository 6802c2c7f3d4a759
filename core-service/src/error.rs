use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl CoreError {
    /// Returns `true` if the host cannot play audio with what it provided.
    pub fn is_capability_error(&self) -> bool {
        match self {
            CoreError::CapabilityMissing { .. } => true,
            CoreError::Playback(err) => err.is_capability_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
