//! Set storage: one period collection per value.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use chronos_core::cursor::{boxed, BoxCursor, EmptyCursor};
use chronos_core::errors::{ChronosResult, StorageError, TemporalError};
use chronos_core::traits::{IPeriodStorage, ISetStorage};
use chronos_core::{Instant, Period, TimedObject};

use crate::periods::{CompactPeriodStorage, TreePeriodStorage};

/// Maps each value to its own period storage `P`. A value whose last
/// period goes away is dropped from the index.
pub struct IndexedSetStorage<I, V, P> {
    values: FxHashMap<V, P>,
    _instant: PhantomData<I>,
}

/// Set storage for values holding over few periods each.
pub type CompactSetStorage<I, V> = IndexedSetStorage<I, V, CompactPeriodStorage<I>>;

/// Set storage for values holding over many periods each.
pub type TreeSetStorage<I, V> = IndexedSetStorage<I, V, TreePeriodStorage<I>>;

impl<I, V, P> IndexedSetStorage<I, V, P>
where
    I: Instant,
    V: Clone + Eq + Hash,
    P: IPeriodStorage<I> + Default,
{
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
            _instant: PhantomData,
        }
    }
}

fn unknown_value() -> TemporalError {
    TemporalError::NotFound("value not found in set".to_string())
}

fn sorted<'a, I: Instant + 'a, V: 'a>(
    mut entries: Vec<TimedObject<I, V>>,
) -> BoxCursor<'a, TimedObject<I, V>> {
    entries.sort_by(|a, b| a.period().cmp(b.period()));
    boxed(entries.into_iter())
}

impl<I, V, P> Default for IndexedSetStorage<I, V, P>
where
    I: Instant,
    V: Clone + Eq + Hash,
    P: IPeriodStorage<I> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug, V: fmt::Debug, P: fmt::Debug> fmt::Debug for IndexedSetStorage<I, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

impl<I, V, P> ISetStorage<I, V> for IndexedSetStorage<I, V, P>
where
    I: Instant,
    V: Clone + Eq + Hash,
    P: IPeriodStorage<I> + Default,
{
    fn first_period(&self, value: &V) -> ChronosResult<Period<I>> {
        let first = self.values.get(value).and_then(|s| s.first_period());
        Ok(first.ok_or_else(unknown_value)?)
    }

    fn last_period(&self, value: &V) -> ChronosResult<Period<I>> {
        let last = self.values.get(value).and_then(|s| s.last_period());
        Ok(last.ok_or_else(unknown_value)?)
    }

    fn get_period(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        Ok(self.values.get(value).and_then(|s| s.get_period(instant)))
    }

    fn get_period_ending_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        Ok(self
            .values
            .get(value)
            .and_then(|s| s.get_period_ending_at(instant)))
    }

    fn get_period_starting_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        Ok(self
            .values
            .get(value)
            .and_then(|s| s.get_period_starting_at(instant)))
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        Ok(self.values.contains_key(value))
    }

    fn len(&self) -> ChronosResult<usize> {
        Ok(self.values.values().map(|s| s.len()).sum())
    }

    fn len_for(&self, value: &V) -> ChronosResult<usize> {
        Ok(self.values.get(value).map_or(0, |s| s.len()))
    }

    fn len_values(&self) -> ChronosResult<usize> {
        Ok(self.values.len())
    }

    fn len_at(&self, instant: &I) -> ChronosResult<usize> {
        Ok(self
            .values
            .values()
            .filter(|s| s.get_period(instant).is_some())
            .count())
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        Ok(self.values.is_empty())
    }

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        let entries = self
            .values
            .iter()
            .flat_map(|(v, s)| s.period_cursor().map(move |p| TimedObject::new(p, v.clone())))
            .collect();
        Ok(sorted(entries))
    }

    fn entry_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        let entries = self
            .values
            .iter()
            .filter_map(|(v, s)| s.get_period(instant).map(|p| TimedObject::new(p, v.clone())))
            .collect();
        Ok(sorted(entries))
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        let entries = self
            .values
            .iter()
            .flat_map(|(v, s)| {
                s.period_cursor_in(range)
                    .map(move |p| TimedObject::new(p, v.clone()))
            })
            .collect();
        Ok(sorted(entries))
    }

    fn period_cursor_for(&self, value: &V) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        Ok(match self.values.get(value) {
            Some(s) => s.period_cursor(),
            None => Box::new(EmptyCursor::new()),
        })
    }

    fn period_cursor_for_in(
        &self,
        range: &Period<I>,
        value: &V,
    ) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        Ok(match self.values.get(value) {
            Some(s) => s.period_cursor_in(range),
            None => Box::new(EmptyCursor::new()),
        })
    }

    fn value_cursor(&self) -> ChronosResult<BoxCursor<'_, V>> {
        Ok(boxed(self.values.keys().cloned()))
    }

    fn value_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, V>> {
        let instant = instant.clone();
        Ok(boxed(
            self.values
                .iter()
                .filter(move |(_, s)| s.get_period(&instant).is_some())
                .map(|(v, _)| v.clone()),
        ))
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        self.values.entry(value).or_default().put(period)
    }

    fn remove(&mut self, period: &Period<I>, value: &V) -> ChronosResult<()> {
        let storage = self
            .values
            .get_mut(value)
            .ok_or_else(|| StorageError::MissingEntry(period.to_string()))?;
        storage.remove(period)?;
        if storage.is_empty() {
            self.values.remove(value);
        }
        Ok(())
    }

    fn remove_range_for(&mut self, range: &Period<I>, value: &V) -> ChronosResult<usize> {
        let Some(storage) = self.values.get_mut(value) else {
            return Ok(0);
        };
        let removed = storage.remove_range(range);
        if storage.is_empty() {
            self.values.remove(value);
        }
        Ok(removed)
    }

    fn remove_value(&mut self, value: &V) -> ChronosResult<bool> {
        Ok(self
            .values
            .remove(value)
            .is_some_and(|storage| !storage.is_empty()))
    }

    fn clear(&mut self) -> ChronosResult<()> {
        self.values.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    #[test]
    fn test_values_overlap_freely() {
        let mut s: CompactSetStorage<Tick, &str> = IndexedSetStorage::new();
        s.put(p(1, 5), "x").unwrap();
        s.put(p(3, 8), "y").unwrap();
        assert_eq!(s.len().unwrap(), 2);
        assert_eq!(s.len_at(&Tick::At(4)).unwrap(), 2);
        assert_eq!(s.len_at(&Tick::At(6)).unwrap(), 1);
        let mut at_four: Vec<_> = s.value_cursor_at(&Tick::At(4)).unwrap().collect();
        at_four.sort();
        assert_eq!(at_four, vec!["x", "y"]);
    }

    #[test]
    fn test_entries_sorted_by_period() {
        let mut s: TreeSetStorage<Tick, u8> = IndexedSetStorage::new();
        s.put(p(5, 6), 1).unwrap();
        s.put(p(0, 2), 2).unwrap();
        s.put(p(3, 4), 1).unwrap();
        let periods: Vec<_> = s.entry_cursor().unwrap().map(|e| e.period().clone()).collect();
        assert_eq!(periods, vec![p(0, 2), p(3, 4), p(5, 6)]);
    }

    #[test]
    fn test_last_removal_drops_value() {
        let mut s: CompactSetStorage<Tick, u8> = IndexedSetStorage::new();
        s.put(p(0, 2), 7).unwrap();
        s.remove(&p(0, 2), &7).unwrap();
        assert!(!s.contains_value(&7).unwrap());
        assert_eq!(s.len_values().unwrap(), 0);
        assert!(s.first_period(&7).unwrap_err().is_not_found());
        assert!(!s.remove_value(&7).unwrap());
    }
}
