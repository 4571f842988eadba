mod cache_error;
mod chronos_error;
mod storage_error;
mod temporal_error;

pub use cache_error::CacheError;
pub use chronos_error::{ChronosError, ChronosResult};
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
