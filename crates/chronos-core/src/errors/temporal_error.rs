/// Errors raised by the interval algebra and the attribute/set engines.
#[derive(Debug, thiserror::Error)]
pub enum TemporalError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid period: start {start} must be before end {end}")]
    InvalidPeriod { start: String, end: String },

    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
