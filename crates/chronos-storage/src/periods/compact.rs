use smallvec::SmallVec;

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{ChronosResult, StorageError};
use chronos_core::traits::IPeriodStorage;
use chronos_core::{Instant, Period};

use crate::sorted::{slice_containing, slice_ending_at, slice_overlapping, slice_search_start};

/// Periods in a sorted inline vector. Most values of a set hold over one
/// or two periods, which then need no heap allocation at all.
#[derive(Debug, Clone)]
pub struct CompactPeriodStorage<I> {
    periods: SmallVec<[Period<I>; 2]>,
}

impl<I: Instant> Default for CompactPeriodStorage<I> {
    fn default() -> Self {
        Self {
            periods: SmallVec::new(),
        }
    }
}

impl<I: Instant> IPeriodStorage<I> for CompactPeriodStorage<I> {
    fn first_period(&self) -> Option<Period<I>> {
        self.periods.first().cloned()
    }

    fn last_period(&self) -> Option<Period<I>> {
        self.periods.last().cloned()
    }

    fn get_period(&self, instant: &I) -> Option<Period<I>> {
        slice_containing(&self.periods, instant).map(|idx| self.periods[idx].clone())
    }

    fn get_period_ending_at(&self, instant: &I) -> Option<Period<I>> {
        slice_ending_at(&self.periods, instant).map(|idx| self.periods[idx].clone())
    }

    fn get_period_starting_at(&self, instant: &I) -> Option<Period<I>> {
        slice_search_start(&self.periods, instant)
            .ok()
            .map(|idx| self.periods[idx].clone())
    }

    fn len(&self) -> usize {
        self.periods.len()
    }

    fn is_empty_in(&self, range: &Period<I>) -> bool {
        slice_overlapping(&self.periods, range).is_empty()
    }

    fn period_cursor(&self) -> BoxCursor<'_, Period<I>> {
        boxed(self.periods.iter().cloned())
    }

    fn period_cursor_in(&self, range: &Period<I>) -> BoxCursor<'_, Period<I>> {
        let span = slice_overlapping(&self.periods, range);
        boxed(self.periods[span].iter().cloned())
    }

    fn put(&mut self, period: Period<I>) -> ChronosResult<()> {
        match slice_search_start(&self.periods, period.start()) {
            Ok(idx) => Err(StorageError::KeyCollision(format!(
                "{period} collides with {}",
                self.periods[idx]
            ))
            .into()),
            Err(idx) => {
                self.periods.insert(idx, period);
                Ok(())
            }
        }
    }

    fn remove(&mut self, period: &Period<I>) -> ChronosResult<()> {
        match slice_search_start(&self.periods, period.start()) {
            Ok(idx) if self.periods[idx] == *period => {
                self.periods.remove(idx);
                Ok(())
            }
            _ => Err(StorageError::MissingEntry(period.to_string()).into()),
        }
    }

    fn remove_range(&mut self, range: &Period<I>) -> usize {
        let span = slice_overlapping(&self.periods, range);
        let count = span.len();
        self.periods.drain(span);
        count
    }

    fn clear(&mut self) {
        self.periods.clear();
    }
}
