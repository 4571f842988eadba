//! Read-through LRU cache over a point time series.
//!
//! Misses are forwarded to a [`MissingElementHandler`], which fills the
//! cache through a [`PointFill`] (possibly with more than the requested
//! instant). Instants the handler could not fill are remembered as absent,
//! so repeated misses do not reach the backing store again.

use chronos_core::config::CacheConfig;
use chronos_core::errors::{CacheError, ChronosResult};
use chronos_core::traits::ITimeSeries;
use chronos_core::{Instant, Period};
use tracing::trace;

use crate::handler::NoChangeHandler;
use crate::lru::LruCache;

#[derive(Debug, Clone)]
enum Slot<V> {
    Present(V),
    Absent,
}

impl<V: Clone> Slot<V> {
    fn from_option(value: Option<V>) -> Self {
        match value {
            Some(v) => Slot::Present(v),
            None => Slot::Absent,
        }
    }

    fn to_option(&self) -> Option<V> {
        match self {
            Slot::Present(v) => Some(v.clone()),
            Slot::Absent => None,
        }
    }
}

/// Write access to the cache handed to a [`MissingElementHandler`].
///
/// The slot filled for the requested instant is kept aside, so a handler
/// that prefetches past the capacity cannot evict the answer it was asked for.
pub struct PointFill<'a, I, V> {
    cache: &'a mut LruCache<I, Slot<V>>,
    requested: &'a I,
    resolved: Option<Slot<V>>,
}

impl<I: Instant, V: Clone> PointFill<'_, I, V> {
    /// Cache `value` at `instant`; `None` records a known absence.
    pub fn put_in_cache(&mut self, instant: I, value: Option<V>) {
        let slot = Slot::from_option(value);
        if instant == *self.requested {
            self.resolved = Some(slot.clone());
        }
        self.cache.put(instant, slot);
    }
}

/// Loads elements the cache does not hold.
pub trait MissingElementHandler<I, V> {
    fn populate_element(&mut self, fill: &mut PointFill<'_, I, V>, instant: &I) -> ChronosResult<()>;
}

/// Persists writes made through the cache.
pub trait PointChangeHandler<I, V> {
    fn put(&mut self, instant: &I, value: &V) -> ChronosResult<()>;
    fn remove(&mut self, instant: &I) -> ChronosResult<()>;
    fn remove_period(&mut self, period: &Period<I>) -> ChronosResult<()>;
}

impl<I, V> PointChangeHandler<I, V> for NoChangeHandler {
    fn put(&mut self, _instant: &I, _value: &V) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }

    fn remove(&mut self, _instant: &I) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }

    fn remove_period(&mut self, _period: &Period<I>) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }
}

pub struct PointCache<I, V, R, W = NoChangeHandler> {
    cache: LruCache<I, Slot<V>>,
    reader: R,
    writer: W,
}

impl<I, V, R> PointCache<I, V, R, NoChangeHandler>
where
    I: Instant,
    V: Clone,
    R: MissingElementHandler<I, V>,
{
    /// A cache whose writes all fail with [`CacheError::ReadOnly`].
    pub fn read_only(capacity: usize, reader: R) -> ChronosResult<Self> {
        Self::new(capacity, reader, NoChangeHandler)
    }
}

impl<I, V, R, W> PointCache<I, V, R, W>
where
    I: Instant,
    V: Clone,
    R: MissingElementHandler<I, V>,
    W: PointChangeHandler<I, V>,
{
    pub fn new(capacity: usize, reader: R, writer: W) -> ChronosResult<Self> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
            reader,
            writer,
        })
    }

    pub fn from_config(config: &CacheConfig, reader: R, writer: W) -> ChronosResult<Self> {
        config.validate()?;
        Self::new(config.point_cache_capacity, reader, writer)
    }

    /// Seed the cache without going through the handlers.
    pub fn put_in_cache(&mut self, instant: I, value: Option<V>) {
        self.cache.put(instant, Slot::from_option(value));
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Instants currently cached, absences included.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<I, V, R, W> ITimeSeries<I, V> for PointCache<I, V, R, W>
where
    I: Instant,
    V: Clone,
    R: MissingElementHandler<I, V>,
    W: PointChangeHandler<I, V>,
{
    fn get(&mut self, instant: &I) -> ChronosResult<Option<V>> {
        if let Some(slot) = self.cache.get(instant) {
            return Ok(slot.to_option());
        }
        trace!(?instant, "point cache miss");
        let mut fill = PointFill {
            cache: &mut self.cache,
            requested: instant,
            resolved: None,
        };
        self.reader.populate_element(&mut fill, instant)?;
        let slot = fill.resolved.take().unwrap_or(Slot::Absent);
        let value = slot.to_option();
        self.cache.put(instant.clone(), slot);
        Ok(value)
    }

    fn put(&mut self, instant: I, value: V) -> ChronosResult<Option<V>> {
        let previous = self.get(&instant)?;
        self.writer.put(&instant, &value)?;
        self.cache.put(instant, Slot::Present(value));
        Ok(previous)
    }

    fn remove(&mut self, instant: &I) -> ChronosResult<Option<V>> {
        let previous = self.get(instant)?;
        self.writer.remove(instant)?;
        self.cache.put(instant.clone(), Slot::Absent);
        Ok(previous)
    }

    /// Forwards to the writer, then drops the whole cache.
    fn remove_period(&mut self, period: &Period<I>) -> ChronosResult<()> {
        self.writer.remove_period(period)?;
        self.cache.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;

    /// Knows the squares of even ticks and counts how often it is asked.
    #[derive(Default)]
    struct Squares {
        reads: usize,
    }

    impl MissingElementHandler<Tick, i64> for Squares {
        fn populate_element(&mut self, fill: &mut PointFill<'_, Tick, i64>, instant: &Tick) -> ChronosResult<()> {
            self.reads += 1;
            if let Tick::At(n) = instant {
                if n % 2 == 0 {
                    fill.put_in_cache(instant.clone(), Some(n * n));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_absence_is_remembered() {
        let mut ts = PointCache::read_only(4, Squares::default()).unwrap();
        assert_eq!(ts.get(&Tick::At(4)).unwrap(), Some(16));
        assert_eq!(ts.get(&Tick::At(3)).unwrap(), None);
        assert_eq!(ts.get(&Tick::At(3)).unwrap(), None);
        assert!(ts.contains_instant(&Tick::At(4)).unwrap());
        assert_eq!(ts.reader().reads, 2);
    }

    /// Fills the requested tick and the three after it.
    struct Runs;

    impl MissingElementHandler<Tick, i64> for Runs {
        fn populate_element(&mut self, fill: &mut PointFill<'_, Tick, i64>, instant: &Tick) -> ChronosResult<()> {
            if let Tick::At(n) = instant {
                for k in *n..*n + 4 {
                    fill.put_in_cache(Tick::At(k), Some(k));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_prefetch_past_capacity_keeps_requested_value() {
        let mut ts = PointCache::read_only(2, Runs).unwrap();
        assert_eq!(ts.get(&Tick::At(10)).unwrap(), Some(10));
        assert_eq!(ts.get(&Tick::At(10)).unwrap(), Some(10));
        assert_eq!(ts.cached_len(), 2);
        assert!(ts.contains_instant(&Tick::At(13)).unwrap());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut ts = PointCache::read_only(4, Squares::default()).unwrap();
        let err = ts.put(Tick::At(1), 1).unwrap_err();
        assert!(err.is_unsupported());
        assert!(ts.remove(&Tick::At(2)).is_err());
    }

    #[test]
    fn test_seeded_value_skips_reader() {
        let mut ts = PointCache::read_only(4, Squares::default()).unwrap();
        ts.put_in_cache(Tick::At(7), Some(0));
        assert_eq!(ts.get(&Tick::At(7)).unwrap(), Some(0));
        assert_eq!(ts.reader().reads, 0);
    }
}
