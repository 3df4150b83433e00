use thiserror::Error;

/// Errors surfaced by the public tracking and storage API.
///
/// Storage variants carry the rendered `anyhow` context chain from the
/// database worker so callers get the full cause without depending on it.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("a tracking session is already active")]
    AlreadyTracking,

    #[error("metric synthesis failed: {0}")]
    Synthesis(String),

    #[error("failed to initialize session storage: {0}")]
    StorageInit(String),

    #[error("failed to write sessions: {0}")]
    StorageWrite(String),

    #[error("failed to read sessions: {0}")]
    StorageRead(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("settings I/O failed: {0}")]
    Settings(String),
}

impl TrackerError {
    pub(crate) fn storage_init(err: anyhow::Error) -> Self {
        Self::StorageInit(format!("{err:#}"))
    }

    pub(crate) fn storage_write(err: anyhow::Error) -> Self {
        Self::StorageWrite(format!("{err:#}"))
    }

    pub(crate) fn storage_read(err: anyhow::Error) -> Self {
        Self::StorageRead(format!("{err:#}"))
    }

    pub(crate) fn settings(err: anyhow::Error) -> Self {
        Self::Settings(format!("{err:#}"))
    }
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
