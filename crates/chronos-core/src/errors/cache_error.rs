/// Caching layer errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("population gap between {end} and caching limit {limit}")]
    PopulationGap { end: String, limit: String },

    #[error("cache not populated: {0}")]
    NotPopulated(String),

    #[error("cache is read-only")]
    ReadOnly,

    #[error("change handler failed: {0}")]
    Handler(String),
}
