//! Canonical shared instances of recently seen instants.

use std::sync::Arc;

use chronos_core::config::CacheConfig;
use chronos_core::errors::ChronosResult;
use chronos_core::Instant;

use crate::lru::LruCache;

/// Hands out one `Arc` per distinct instant while it stays among the
/// `capacity` most recently interned. Equal instants interned while cached
/// share an allocation.
pub struct InstantInterner<I> {
    cache: LruCache<I, Arc<I>>,
}

impl<I: Instant> InstantInterner<I> {
    pub fn new(capacity: usize) -> ChronosResult<Self> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
        })
    }

    pub fn from_config(config: &CacheConfig) -> ChronosResult<Self> {
        config.validate()?;
        Self::new(config.interner_capacity)
    }

    pub fn intern(&mut self, instant: I) -> Arc<I> {
        if let Some(shared) = self.cache.get(&instant) {
            return Arc::clone(shared);
        }
        let shared = Arc::new(instant.clone());
        self.cache.put(instant, Arc::clone(&shared));
        shared
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;

    #[test]
    fn test_equal_instants_share() {
        let mut interner = InstantInterner::new(2).unwrap();
        let a = interner.intern(Tick::At(5));
        let b = interner.intern(Tick::At(5));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_evicted_instant_gets_fresh_allocation() {
        let mut interner = InstantInterner::new(2).unwrap();
        let first = interner.intern(Tick::At(1));
        interner.intern(Tick::At(2));
        interner.intern(Tick::At(3));
        let again = interner.intern(Tick::At(1));
        assert_eq!(first, again);
        assert!(!Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_from_config_rejects_zero() {
        let config = CacheConfig {
            interner_capacity: 0,
            ..CacheConfig::default()
        };
        assert!(InstantInterner::<Tick>::from_config(&config).is_err());
    }
}
