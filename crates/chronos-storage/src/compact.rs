//! Array-backed attribute storage for collections expected to stay small.
//!
//! Lookups binary-search on period start; inserts and removals shift the
//! tail of the vector, trading write scalability for memory density.

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{ChronosResult, StorageError, TemporalError};
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Instant, Period, TimedObject};

use crate::sorted::{slice_containing, slice_ending_at, slice_overlapping, slice_search_start};

#[derive(Debug, Clone)]
pub struct CompactAttributeStorage<I, V> {
    entries: Vec<TimedObject<I, V>>,
}

impl<I: Instant, V: Clone + PartialEq> CompactAttributeStorage<I, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Release spare capacity left behind by removals.
    pub fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }

    fn overlapping(&self, range: &Period<I>) -> &[TimedObject<I, V>] {
        &self.entries[slice_overlapping(&self.entries, range)]
    }
}

impl<I: Instant, V: Clone + PartialEq> Default for CompactAttributeStorage<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Instant, V: Clone + PartialEq> IAttributeStorage<I, V> for CompactAttributeStorage<I, V> {
    fn first_period(&self) -> ChronosResult<Period<I>> {
        let first = self
            .entries
            .first()
            .ok_or_else(|| TemporalError::NotFound("storage is empty".to_string()))?;
        Ok(first.period().clone())
    }

    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        let first = self
            .overlapping(range)
            .first()
            .ok_or_else(|| TemporalError::NotFound(format!("no entry overlaps {range}")))?;
        Ok(first.period().clone())
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        let last = self
            .entries
            .last()
            .ok_or_else(|| TemporalError::NotFound("storage is empty".to_string()))?;
        Ok(last.period().clone())
    }

    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        let last = self
            .overlapping(range)
            .last()
            .ok_or_else(|| TemporalError::NotFound(format!("no entry overlaps {range}")))?;
        Ok(last.period().clone())
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(slice_containing(&self.entries, instant).map(|idx| self.entries[idx].clone()))
    }

    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(slice_ending_at(&self.entries, instant).map(|idx| self.entries[idx].clone()))
    }

    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(slice_search_start(&self.entries, instant)
            .ok()
            .map(|idx| self.entries[idx].clone()))
    }

    fn len(&self) -> ChronosResult<usize> {
        Ok(self.entries.len())
    }

    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        Ok(self.overlapping(range).len())
    }

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        Ok(boxed(self.entries.iter().cloned()))
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        Ok(boxed(self.overlapping(range).iter().cloned()))
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        match slice_search_start(&self.entries, period.start()) {
            Ok(idx) => Err(StorageError::KeyCollision(format!(
                "{period} already holds {}",
                self.entries[idx].period()
            ))
            .into()),
            Err(idx) => {
                self.entries.insert(idx, TimedObject::new(period, value));
                Ok(())
            }
        }
    }

    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        match slice_search_start(&self.entries, period.start()) {
            Ok(idx) if self.entries[idx].period() == period => {
                self.entries.remove(idx);
                Ok(())
            }
            _ => Err(StorageError::MissingEntry(period.to_string()).into()),
        }
    }

    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        let span = slice_overlapping(&self.entries, range);
        let count = span.len();
        self.entries.drain(span);
        Ok(count)
    }

    fn clear(&mut self) -> ChronosResult<()> {
        self.entries.clear();
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
    fn test_out_of_order_puts_stay_sorted() {
        let mut s = CompactAttributeStorage::new();
        s.put(p(5, 6), 'c').unwrap();
        s.put(p(1, 2), 'a').unwrap();
        s.put(p(3, 5), 'b').unwrap();
        let starts: Vec<_> = s.period_cursor().unwrap().map(|p| p.start().clone()).collect();
        assert_eq!(starts, vec![Tick::At(1), Tick::At(3), Tick::At(5)]);
        assert_eq!(s.get_value(&Tick::At(4)).unwrap(), Some('b'));
        assert_eq!(s.get_entry_ending_at(&Tick::At(5)).unwrap().unwrap().value(), &'b');
    }

    #[test]
    fn test_remove_range_drains_overlap() {
        let mut s = CompactAttributeStorage::new();
        for (i, c) in ['a', 'b', 'c', 'd'].into_iter().enumerate() {
            let start = i as i64 * 2;
            s.put(p(start, start + 1), c).unwrap();
        }
        assert_eq!(s.remove_range(&p(1, 5)).unwrap(), 2);
        assert_eq!(s.len().unwrap(), 2);
        assert_eq!(s.get_value(&Tick::At(6)).unwrap(), Some('d'));
    }
}
