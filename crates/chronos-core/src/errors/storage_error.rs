/// Storage backend errors. Any of these surfacing from the engine means a
/// backend broke its contract.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("period key already stored: {0}")]
    KeyCollision(String),

    #[error("no entry stored for period {0}")]
    MissingEntry(String),

    #[error("storage invariant violated: {0}")]
    InvariantViolation(String),

    #[error("backend failure: {0}")]
    Backend(String),
}
