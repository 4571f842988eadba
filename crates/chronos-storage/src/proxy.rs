//! Forwarding wrapper that counts and traces the writes reaching a storage.

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::ChronosResult;
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Instant, Period, TimedObject};
use tracing::trace;

/// Write counters kept by a [`StorageProxy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub puts: usize,
    pub entry_removals: usize,
    pub range_removals: usize,
    pub clears: usize,
    /// Completed `begin`/`end` bracket pairs.
    pub atomic_operations: usize,
}

impl StorageStats {
    /// Every mutation that reached the wrapped storage.
    pub fn writes(&self) -> usize {
        self.puts + self.entry_removals + self.range_removals + self.clears
    }
}

/// Wraps any attribute storage, forwarding every call unchanged.
#[derive(Debug, Clone, Default)]
pub struct StorageProxy<S> {
    inner: S,
    stats: StorageStats,
}

impl<S> StorageProxy<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: StorageStats::default(),
        }
    }

    pub fn stats(&self) -> StorageStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = StorageStats::default();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<I, V, S> IAttributeStorage<I, V> for StorageProxy<S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V>,
{
    fn first_period(&self) -> ChronosResult<Period<I>> {
        self.inner.first_period()
    }

    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.inner.first_period_in(range)
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        self.inner.last_period()
    }

    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.inner.last_period_in(range)
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.inner.get_entry(instant)
    }

    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.inner.get_entry_ending_at(instant)
    }

    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.inner.get_entry_starting_at(instant)
    }

    fn get_value(&self, instant: &I) -> ChronosResult<Option<V>> {
        self.inner.get_value(instant)
    }

    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>> {
        self.inner.get_period(instant)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.inner.len()
    }

    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        self.inner.len_in(range)
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.inner.is_empty()
    }

    fn is_empty_in(&self, range: &Period<I>) -> ChronosResult<bool> {
        self.inner.is_empty_in(range)
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.inner.contains_value(value)
    }

    fn contains_value_in(&self, value: &V, range: &Period<I>) -> ChronosResult<bool> {
        self.inner.contains_value_in(value, range)
    }

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.inner.entry_cursor()
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.inner.entry_cursor_in(range)
    }

    fn period_cursor<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        self.inner.period_cursor()
    }

    fn period_cursor_in<'a>(&'a self, range: &Period<I>) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        self.inner.period_cursor_in(range)
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        trace!(%period, "storage put");
        self.stats.puts += 1;
        self.inner.put(period, value)
    }

    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        trace!(%period, "storage remove_entry");
        self.stats.entry_removals += 1;
        self.inner.remove_entry(period)
    }

    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        self.stats.range_removals += 1;
        let removed = self.inner.remove_range(range)?;
        trace!(%range, removed, "storage remove_range");
        Ok(removed)
    }

    fn clear(&mut self) -> ChronosResult<()> {
        trace!("storage clear");
        self.stats.clears += 1;
        self.inner.clear()
    }

    fn begin_atomic_operation(&mut self) -> ChronosResult<()> {
        self.inner.begin_atomic_operation()
    }

    fn end_atomic_operation(&mut self) -> ChronosResult<()> {
        self.stats.atomic_operations += 1;
        self.inner.end_atomic_operation()
    }
}
