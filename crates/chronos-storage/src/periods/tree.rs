use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{ChronosResult, StorageError};
use chronos_core::traits::IPeriodStorage;
use chronos_core::{Instant, Period};

use crate::sorted::{tree_containing, tree_ending_at, tree_overlapping, tree_overlapping_keys};

/// Periods in a `BTreeMap` keyed by start. Suits values holding over many
/// disjoint periods.
#[derive(Debug, Clone)]
pub struct TreePeriodStorage<I> {
    periods: BTreeMap<I, Period<I>>,
}

impl<I: Instant> Default for TreePeriodStorage<I> {
    fn default() -> Self {
        Self {
            periods: BTreeMap::new(),
        }
    }
}

impl<I: Instant> IPeriodStorage<I> for TreePeriodStorage<I> {
    fn first_period(&self) -> Option<Period<I>> {
        self.periods.first_key_value().map(|(_, p)| p.clone())
    }

    fn last_period(&self) -> Option<Period<I>> {
        self.periods.last_key_value().map(|(_, p)| p.clone())
    }

    fn get_period(&self, instant: &I) -> Option<Period<I>> {
        tree_containing(&self.periods, instant).cloned()
    }

    fn get_period_ending_at(&self, instant: &I) -> Option<Period<I>> {
        tree_ending_at(&self.periods, instant).cloned()
    }

    fn get_period_starting_at(&self, instant: &I) -> Option<Period<I>> {
        self.periods.get(instant).cloned()
    }

    fn len(&self) -> usize {
        self.periods.len()
    }

    fn is_empty_in(&self, range: &Period<I>) -> bool {
        tree_overlapping(&self.periods, range).next().is_none()
    }

    fn period_cursor(&self) -> BoxCursor<'_, Period<I>> {
        boxed(self.periods.values().cloned())
    }

    fn period_cursor_in(&self, range: &Period<I>) -> BoxCursor<'_, Period<I>> {
        boxed(tree_overlapping(&self.periods, range).map(|(_, p)| p.clone()))
    }

    fn put(&mut self, period: Period<I>) -> ChronosResult<()> {
        match self.periods.entry(period.start().clone()) {
            Entry::Occupied(existing) => Err(StorageError::KeyCollision(format!(
                "{period} collides with {}",
                existing.get()
            ))
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(period);
                Ok(())
            }
        }
    }

    fn remove(&mut self, period: &Period<I>) -> ChronosResult<()> {
        match self.periods.get(period.start()) {
            Some(stored) if stored == period => {
                self.periods.remove(period.start());
                Ok(())
            }
            _ => Err(StorageError::MissingEntry(period.to_string()).into()),
        }
    }

    fn remove_range(&mut self, range: &Period<I>) -> usize {
        let keys = tree_overlapping_keys(&self.periods, range);
        for key in &keys {
            self.periods.remove(key);
        }
        keys.len()
    }

    fn clear(&mut self) {
        self.periods.clear();
    }
}
