//! Attribute storage over externally persisted rows.
//!
//! Each stored entry is an object obtained from a [`TimedObjectFactory`],
//! typically a row mapped by a persistence layer. Entries are indexed in
//! memory by period start; the factory hears about every creation and every
//! removal so the rows behind them can follow.

use std::fmt;

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::{ChronosResult, StorageError};
use chronos_core::traits::{IAttributeStorage, TimedObjectFactory};
use chronos_core::{Instant, Period, TimedObject};
use tracing::{trace, warn};

use crate::tree::TreeAttributeStorage;

pub struct MappedAttributeStorage<I, V, F> {
    rows: TreeAttributeStorage<I, V>,
    factory: F,
}

impl<I, V, F> MappedAttributeStorage<I, V, F>
where
    I: Instant,
    V: Clone + PartialEq,
    F: TimedObjectFactory<I, V>,
{
    pub fn new(factory: F) -> Self {
        Self {
            rows: TreeAttributeStorage::new(),
            factory,
        }
    }

    /// Index rows that already exist in the backing store. The factory is
    /// not consulted for these.
    pub fn load(factory: F, rows: impl IntoIterator<Item = TimedObject<I, V>>) -> ChronosResult<Self> {
        let mut storage = Self::new(factory);
        for row in rows {
            storage.rows.insert(row)?;
        }
        Ok(storage)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    fn destroy_all(&mut self, objects: Vec<TimedObject<I, V>>) -> ChronosResult<usize> {
        let count = objects.len();
        for object in objects {
            self.factory.destroy(object)?;
        }
        Ok(count)
    }
}

impl<I: fmt::Debug, V: fmt::Debug, F> fmt::Debug for MappedAttributeStorage<I, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedAttributeStorage")
            .field("rows", &self.rows)
            .finish_non_exhaustive()
    }
}

/// Reads are answered from the in-memory index. The atomic brackets keep
/// their no-op defaults: transactions belong to the persistence layer.
impl<I, V, F> IAttributeStorage<I, V> for MappedAttributeStorage<I, V, F>
where
    I: Instant,
    V: Clone + PartialEq,
    F: TimedObjectFactory<I, V>,
{
    fn first_period(&self) -> ChronosResult<Period<I>> {
        self.rows.first_period()
    }

    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.rows.first_period_in(range)
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        self.rows.last_period()
    }

    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.rows.last_period_in(range)
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.rows.get_entry(instant)
    }

    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.rows.get_entry_ending_at(instant)
    }

    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.rows.get_entry_starting_at(instant)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.rows.len()
    }

    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        self.rows.len_in(range)
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.rows.is_empty()
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.rows.contains_value(value)
    }

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.rows.entry_cursor()
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.rows.entry_cursor_in(range)
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        let object = self.factory.create(period.clone(), value)?;
        if object.period() != &period {
            warn!(requested = %period, created = %object.period(), "factory changed the period");
            return Err(StorageError::InvariantViolation(format!(
                "factory created {} for {period}",
                object.period()
            ))
            .into());
        }
        trace!(period = %object.period(), "mapped row created");
        self.rows.insert(object)
    }

    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        let object = self.rows.take_entry(period)?;
        trace!(%period, "mapped row destroyed");
        self.factory.destroy(object)
    }

    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        let taken = self.rows.take_range(range);
        self.destroy_all(taken)
    }

    fn clear(&mut self) -> ChronosResult<()> {
        let taken = self.rows.take_all();
        self.destroy_all(taken).map(drop)
    }
}
