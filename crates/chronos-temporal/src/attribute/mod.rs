//! TemporalAttribute: the single-valued engine implementing ITemporalAttribute.

mod sub_map;

pub use sub_map::SubMap;

use std::fmt;
use std::marker::PhantomData;

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::ChronosResult;
use chronos_core::traits::{IAttributeStorage, ITemporalAttribute};
use chronos_core::{Instant, Period, TimedObject};
use tracing::trace;

use crate::views::{EntrySet, PeriodSet};

/// A time-varying, single-valued association over a pluggable storage.
///
/// Every write re-fragments the stored entries so that they never overlap
/// and no two adjacent entries carry equal values. The storage only sees
/// exact-key puts and removals, bracketed by one atomic operation per
/// public write.
pub struct TemporalAttribute<I, V, S> {
    storage: S,
    atomic_level: usize,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<I, V, S> TemporalAttribute<I, V, S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V>,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            atomic_level: 0,
            _marker: PhantomData,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Run `op` inside one atomic bracket. Brackets nest: only the
    /// outermost level reaches the storage, and it is closed even when
    /// `op` fails. The first error wins.
    pub fn atomically<T>(&mut self, op: impl FnOnce(&mut Self) -> ChronosResult<T>) -> ChronosResult<T> {
        if self.atomic_level == 0 {
            self.storage.begin_atomic_operation()?;
        }
        self.atomic_level += 1;
        let result = op(self);
        self.atomic_level -= 1;
        if self.atomic_level > 0 {
            return result;
        }
        let closed = self.storage.end_atomic_operation();
        match (result, closed) {
            (Err(err), _) | (Ok(_), Err(err)) => Err(err),
            (Ok(value), Ok(())) => Ok(value),
        }
    }

    /// A view restricted to `range`. Reads are clipped to it and writes
    /// must lie inside it.
    pub fn sub_map(&mut self, range: Period<I>) -> SubMap<'_, I, V, S> {
        SubMap::new(self, range)
    }

    /// Live view over the stored periods; removal writes through.
    pub fn period_set(&mut self) -> PeriodSet<'_, I, V, Self> {
        PeriodSet::new(self)
    }

    /// Live view over the stored entries; removal writes through.
    pub fn entry_set(&mut self) -> EntrySet<'_, I, V, Self> {
        EntrySet::new(self)
    }
}

impl<I, V, S> Default for TemporalAttribute<I, V, S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V> + Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<I, V, S: fmt::Debug> fmt::Debug for TemporalAttribute<I, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.storage.fmt(f)
    }
}

impl<I, V, S> ITemporalAttribute<I, V> for TemporalAttribute<I, V, S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V>,
{
    fn get(&self, instant: &I) -> ChronosResult<Option<V>> {
        self.storage.get_value(instant)
    }

    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>> {
        self.storage.get_period(instant)
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.storage.get_entry(instant)
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.storage.contains_value(value)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.storage.len()
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.storage.is_empty()
    }

    fn first_period(&self) -> ChronosResult<Period<I>> {
        self.storage.first_period()
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        self.storage.last_period()
    }

    fn entries(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.storage.entry_cursor()
    }

    fn periods<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        self.storage.period_cursor()
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<bool> {
        self.atomically(move |this| {
            // skip the storage entirely when the value already holds
            if let Some(existing) = this.storage.get_entry(period.start())? {
                if existing.period().contains(&period) && existing.value() == &value {
                    trace!(%period, "put already satisfied");
                    return Ok(true);
                }
            }

            let overwritten = this.remove(&period)?;
            let mut period = period;
            let mut value = value;

            if let Some(after) = this.storage.get_entry_starting_at(period.end())? {
                if after.value() == &value {
                    this.storage.remove_entry(after.period())?;
                    period = period.union(after.period())?;
                    value = after.into_parts().1;
                }
            }
            if let Some(before) = this.storage.get_entry_ending_at(period.start())? {
                if before.value() == &value {
                    this.storage.remove_entry(before.period())?;
                    period = before.period().union(&period)?;
                    value = before.into_parts().1;
                }
            }

            trace!(%period, overwritten, "put");
            this.storage.put(period, value)?;
            Ok(overwritten)
        })
    }

    fn remove(&mut self, period: &Period<I>) -> ChronosResult<bool> {
        self.atomically(|this| {
            let first = this.storage.get_entry(period.start())?;
            let last = this
                .storage
                .get_entry(period.end())?
                .filter(|e| e.period().start() != period.end());

            let removed = this.storage.remove_range(period)? > 0;

            if let Some(first) = first {
                if first.period().start() < period.start() {
                    if let Some(head) = first.period().preceding_period(period) {
                        this.storage.put(head, first.into_parts().1)?;
                    }
                }
            }
            if let Some(last) = last {
                if last.period().end() > period.end() {
                    if let Some(tail) = last.period().succeeding_period(period) {
                        this.storage.put(tail, last.into_parts().1)?;
                    }
                }
            }

            trace!(%period, removed, "remove");
            Ok(removed)
        })
    }

    fn clear(&mut self) -> ChronosResult<()> {
        self.atomically(|this| this.storage.clear())
    }
}
