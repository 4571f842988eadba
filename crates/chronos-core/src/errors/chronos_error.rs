use super::{CacheError, StorageError, TemporalError};

/// Top-level error type for the chronos workspace.
/// All subsystem errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum ChronosError {
    #[error("temporal error: {0}")]
    TemporalError(#[from] TemporalError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("cache error: {0}")]
    CacheError(#[from] CacheError),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl ChronosError {
    /// True for conditions raised because a collection had nothing to return.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChronosError::TemporalError(TemporalError::NotFound(_)))
    }

    /// True for writes or views that the receiver refuses by construction.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            ChronosError::TemporalError(TemporalError::Unsupported(_))
                | ChronosError::CacheError(CacheError::ReadOnly)
        )
    }
}

/// Convenience type alias.
pub type ChronosResult<T> = Result<T, ChronosError>;
