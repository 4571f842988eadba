//! General-purpose in-memory attribute storage on a `BTreeMap` keyed by
//! period start.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{ChronosResult, StorageError, TemporalError};
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Instant, Period, TimedObject};

use crate::sorted::{tree_containing, tree_ending_at, tree_overlapping, tree_overlapping_keys};

#[derive(Clone)]
pub struct TreeAttributeStorage<I, V> {
    entries: BTreeMap<I, TimedObject<I, V>>,
}

impl<I: Instant, V: Clone + PartialEq> TreeAttributeStorage<I, V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Store an already-built object. Fails on a start collision.
    pub fn insert(&mut self, object: TimedObject<I, V>) -> ChronosResult<()> {
        match self.entries.entry(object.period().start().clone()) {
            Entry::Occupied(existing) => Err(StorageError::KeyCollision(format!(
                "{} already holds {}",
                object.period(),
                existing.get().period()
            ))
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(object);
                Ok(())
            }
        }
    }

    /// Detach the object stored under exactly `period`.
    pub fn take_entry(&mut self, period: &Period<I>) -> ChronosResult<TimedObject<I, V>> {
        match self.entries.get(period.start()) {
            Some(existing) if existing.period() == period => {}
            _ => return Err(StorageError::MissingEntry(period.to_string()).into()),
        }
        self.entries
            .remove(period.start())
            .ok_or_else(|| StorageError::MissingEntry(period.to_string()).into())
    }

    /// Detach every object overlapping `range`, in start order.
    pub fn take_range(&mut self, range: &Period<I>) -> Vec<TimedObject<I, V>> {
        tree_overlapping_keys(&self.entries, range)
            .into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }

    /// Detach everything, in start order.
    pub fn take_all(&mut self) -> Vec<TimedObject<I, V>> {
        std::mem::take(&mut self.entries).into_values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedObject<I, V>> + '_ {
        self.entries.values()
    }
}

impl<I: Instant, V: Clone + PartialEq> Default for TreeAttributeStorage<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug, V: fmt::Debug> fmt::Debug for TreeAttributeStorage<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}

impl<I: Instant, V: Clone + PartialEq> FromIterator<TimedObject<I, V>> for TreeAttributeStorage<I, V> {
    /// Later objects colliding on start replace earlier ones.
    fn from_iter<T: IntoIterator<Item = TimedObject<I, V>>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|o| (o.period().start().clone(), o))
                .collect(),
        }
    }
}

fn empty() -> TemporalError {
    TemporalError::NotFound("storage is empty".to_string())
}

fn none_in(range: &Period<impl Instant>) -> TemporalError {
    TemporalError::NotFound(format!("no entry overlaps {range}"))
}

impl<I: Instant, V: Clone + PartialEq> IAttributeStorage<I, V> for TreeAttributeStorage<I, V> {
    fn first_period(&self) -> ChronosResult<Period<I>> {
        let (_, first) = self.entries.first_key_value().ok_or_else(empty)?;
        Ok(first.period().clone())
    }

    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        let (_, first) = tree_overlapping(&self.entries, range)
            .next()
            .ok_or_else(|| none_in(range))?;
        Ok(first.period().clone())
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        let (_, last) = self.entries.last_key_value().ok_or_else(empty)?;
        Ok(last.period().clone())
    }

    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        let (_, last) = tree_overlapping(&self.entries, range)
            .next_back()
            .ok_or_else(|| none_in(range))?;
        Ok(last.period().clone())
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(tree_containing(&self.entries, instant).cloned())
    }

    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(tree_ending_at(&self.entries, instant).cloned())
    }

    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        Ok(self.entries.get(instant).cloned())
    }

    fn len(&self) -> ChronosResult<usize> {
        Ok(self.entries.len())
    }

    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        Ok(tree_overlapping(&self.entries, range).count())
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        Ok(self.entries.is_empty())
    }

    fn is_empty_in(&self, range: &Period<I>) -> ChronosResult<bool> {
        Ok(tree_overlapping(&self.entries, range).next().is_none())
    }

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        Ok(boxed(self.entries.values().cloned()))
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        Ok(boxed(
            tree_overlapping(&self.entries, range).map(|(_, o)| o.clone()),
        ))
    }

    fn period_cursor<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        Ok(boxed(self.entries.values().map(|o| o.period().clone())))
    }

    fn period_cursor_in<'a>(&'a self, range: &Period<I>) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        Ok(boxed(
            tree_overlapping(&self.entries, range).map(|(_, o)| o.period().clone()),
        ))
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        self.insert(TimedObject::new(period, value))
    }

    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        self.take_entry(period).map(drop)
    }

    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        Ok(self.take_range(range).len())
    }

    fn clear(&mut self) -> ChronosResult<()> {
        self.entries.clear();
        Ok(())
    }
}
