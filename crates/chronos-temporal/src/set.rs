//! TemporalSet: the multi-valued engine implementing ITemporalSet.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::ChronosResult;
use chronos_core::traits::{ISetStorage, ITemporalSet};
use chronos_core::{Instant, Period, TimedObject};
use tracing::trace;

use crate::views::{SetEntrySet, ValuePeriodSet, ValueSet, ValueSetAt};

/// A time-varying set of values over a pluggable storage.
///
/// Each value is defragmented on its own: its periods never overlap and
/// never meet. Different values are independent of each other.
pub struct TemporalSet<I, V, S> {
    storage: S,
    atomic_level: usize,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<I, V, S> TemporalSet<I, V, S>
where
    I: Instant,
    V: Clone + Eq + Hash,
    S: ISetStorage<I, V>,
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

    /// Same bracketing rules as [`crate::TemporalAttribute::atomically`].
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

    pub fn period_set(&mut self, value: V) -> ValuePeriodSet<'_, I, V, Self> {
        ValuePeriodSet::new(self, value)
    }

    pub fn value_set(&mut self) -> ValueSet<'_, I, V, Self> {
        ValueSet::new(self)
    }

    pub fn value_set_at(&self, instant: I) -> ValueSetAt<'_, I, V, Self> {
        ValueSetAt::new(self, instant)
    }

    pub fn entry_set(&mut self) -> SetEntrySet<'_, I, V, Self> {
        SetEntrySet::new(self)
    }
}

impl<I, V, S> Default for TemporalSet<I, V, S>
where
    I: Instant,
    V: Clone + Eq + Hash,
    S: ISetStorage<I, V> + Default,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<I, V, S: fmt::Debug> fmt::Debug for TemporalSet<I, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.storage.fmt(f)
    }
}

impl<I, V, S> ITemporalSet<I, V> for TemporalSet<I, V, S>
where
    I: Instant,
    V: Clone + Eq + Hash,
    S: ISetStorage<I, V>,
{
    fn get_period(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        self.storage.get_period(instant, value)
    }

    fn contains(&self, instant: &I, value: &V) -> ChronosResult<bool> {
        self.storage.contains_value_at(instant, value)
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.storage.contains_value(value)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.storage.len()
    }

    fn len_for(&self, value: &V) -> ChronosResult<usize> {
        self.storage.len_for(value)
    }

    fn len_values(&self) -> ChronosResult<usize> {
        self.storage.len_values()
    }

    fn len_at(&self, instant: &I) -> ChronosResult<usize> {
        self.storage.len_at(instant)
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.storage.is_empty()
    }

    fn is_empty_at(&self, instant: &I) -> ChronosResult<bool> {
        self.storage.is_empty_at(instant)
    }

    fn first_period(&self, value: &V) -> ChronosResult<Period<I>> {
        self.storage.first_period(value)
    }

    fn last_period(&self, value: &V) -> ChronosResult<Period<I>> {
        self.storage.last_period(value)
    }

    fn entries(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.storage.entry_cursor()
    }

    fn values(&self) -> ChronosResult<BoxCursor<'_, V>> {
        self.storage.value_cursor()
    }

    fn values_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, V>> {
        self.storage.value_cursor_at(instant)
    }

    fn periods_for(&self, value: &V) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        self.storage.period_cursor_for(value)
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<bool> {
        self.atomically(move |this| {
            if let Some(existing) = this.storage.get_period(period.start(), &value)? {
                if existing.contains(&period) {
                    trace!(%period, "put already satisfied");
                    return Ok(true);
                }
            }

            let overwritten = this.remove(&period, &value)?;
            let mut period = period;

            if let Some(after) = this.storage.get_period_starting_at(period.end(), &value)? {
                this.storage.remove(&after, &value)?;
                period = period.union(&after)?;
            }
            if let Some(before) = this.storage.get_period_ending_at(period.start(), &value)? {
                this.storage.remove(&before, &value)?;
                period = before.union(&period)?;
            }

            trace!(%period, overwritten, "put value");
            this.storage.put(period, value)?;
            Ok(overwritten)
        })
    }

    fn remove(&mut self, period: &Period<I>, value: &V) -> ChronosResult<bool> {
        self.atomically(|this| {
            let first = this.storage.get_period(period.start(), value)?;
            let last = this
                .storage
                .get_period(period.end(), value)?
                .filter(|p| p.start() != period.end());

            let removed = this.storage.remove_range_for(period, value)? > 0;

            if let Some(first) = first {
                if first.start() < period.start() {
                    if let Some(head) = first.preceding_period(period) {
                        this.storage.put(head, value.clone())?;
                    }
                }
            }
            if let Some(last) = last {
                if last.end() > period.end() {
                    if let Some(tail) = last.succeeding_period(period) {
                        this.storage.put(tail, value.clone())?;
                    }
                }
            }

            trace!(%period, removed, "remove value period");
            Ok(removed)
        })
    }

    fn remove_value(&mut self, value: &V) -> ChronosResult<bool> {
        self.atomically(|this| this.storage.remove_value(value))
    }

    fn remove_period(&mut self, period: &Period<I>) -> ChronosResult<bool> {
        self.atomically(|this| {
            let values: HashSet<V> = this
                .storage
                .entry_cursor_in(period)?
                .map(|e| e.into_parts().1)
                .collect();
            let mut removed = false;
            for value in &values {
                removed |= this.remove(period, value)?;
            }
            trace!(%period, values = values.len(), "remove period");
            Ok(removed)
        })
    }

    fn clear(&mut self) -> ChronosResult<()> {
        self.atomically(|this| this.storage.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;
    use chronos_storage::TreeSetStorage;

    type Set = TemporalSet<Tick, &'static str, TreeSetStorage<Tick, &'static str>>;

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    #[test]
    fn test_values_defragment_independently() {
        let mut set = Set::default();
        assert!(!set.put(p(0, 5), "x").unwrap());
        assert!(!set.put(p(5, 9), "x").unwrap());
        assert!(!set.put(p(3, 7), "y").unwrap());

        assert_eq!(set.periods_for(&"x").unwrap().collect::<Vec<_>>(), vec![p(0, 9)]);
        assert_eq!(set.len_at(&Tick::At(4)).unwrap(), 2);
        assert_eq!(set.len().unwrap(), 2);
    }

    #[test]
    fn test_remove_splits_one_value_only() {
        let mut set = Set::default();
        set.put(p(0, 10), "x").unwrap();
        set.put(p(0, 10), "y").unwrap();
        assert!(set.remove(&p(4, 6), &"x").unwrap());

        assert_eq!(
            set.periods_for(&"x").unwrap().collect::<Vec<_>>(),
            vec![p(0, 4), p(6, 10)]
        );
        assert_eq!(set.get_period(&Tick::At(5), &"y").unwrap(), Some(p(0, 10)));
    }

    #[test]
    fn test_remove_period_covers_every_value() {
        let mut set = Set::default();
        set.put(p(0, 10), "x").unwrap();
        set.put(p(8, 12), "y").unwrap();
        set.put(p(20, 30), "z").unwrap();

        assert!(set.remove_period(&p(5, 15)).unwrap());
        assert_eq!(set.get_period(&Tick::At(1), &"x").unwrap(), Some(p(0, 5)));
        assert!(!set.contains_value(&"y").unwrap());
        assert!(set.contains(&Tick::At(25), &"z").unwrap());
        assert!(!set.remove_period(&p(5, 15)).unwrap());
    }

    #[test]
    fn test_remove_value_reports_presence() {
        let mut set = Set::default();
        set.put(p(0, 1), "x").unwrap();
        assert!(set.remove_value(&"x").unwrap());
        assert!(!set.remove_value(&"x").unwrap());
        assert!(set.is_empty().unwrap());
    }
}
