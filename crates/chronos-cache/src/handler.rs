//! The change handler of read-only caches.

/// Rejects every write with [`CacheError::ReadOnly`].
///
/// [`CacheError::ReadOnly`]: chronos_core::errors::CacheError::ReadOnly
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChangeHandler;
