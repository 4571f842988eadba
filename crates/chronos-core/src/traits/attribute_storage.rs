//! `IAttributeStorage` trait: storage contract for single-valued attributes.
//!
//! Entries are non-overlapping `(period, value)` pairs kept sorted by
//! period start. The storage does no defragmentation of its own: the
//! attribute engine drives it through the boundary lookups below.

use crate::cursor::{boxed, BoxCursor};
use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::timed_object::TimedObject;

// ─── Trait ───────────────────────────────────────────────────────────

/// Raw storage behind a temporal attribute.
///
/// Reads take `&self`; implementations that populate lazily on read use
/// interior mutability. Boundary lookups answer `Ok(None)` when nothing
/// matches, while `first_*`/`last_*` on an empty collection fail with a
/// not-found error.
pub trait IAttributeStorage<I: Instant, V: Clone + PartialEq> {
    // ── boundary queries ──

    fn first_period(&self) -> ChronosResult<Period<I>>;

    /// First stored period overlapping `range`.
    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>>;

    fn last_period(&self) -> ChronosResult<Period<I>>;

    /// Last stored period overlapping `range`.
    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>>;

    /// The entry whose period contains `instant`.
    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>>;

    /// The entry whose period ends exactly at `instant`.
    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>>;

    /// The entry whose period starts exactly at `instant`.
    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>>;

    fn get_value(&self, instant: &I) -> ChronosResult<Option<V>> {
        Ok(self.get_entry(instant)?.map(|e| e.into_parts().1))
    }

    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>> {
        Ok(self.get_entry(instant)?.map(|e| e.into_parts().0))
    }

    // ── sizes ──

    fn len(&self) -> ChronosResult<usize>;

    /// Number of entries overlapping `range`.
    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize>;

    fn is_empty(&self) -> ChronosResult<bool> {
        Ok(self.len()? == 0)
    }

    fn is_empty_in(&self, range: &Period<I>) -> ChronosResult<bool> {
        Ok(self.len_in(range)? == 0)
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        let mut cursor = self.entry_cursor()?;
        Ok(cursor.any(|e| e.value() == value))
    }

    fn contains_value_in(&self, value: &V, range: &Period<I>) -> ChronosResult<bool> {
        let mut cursor = self.entry_cursor_in(range)?;
        Ok(cursor.any(|e| e.value() == value))
    }

    // ── cursors ──

    /// All entries, sorted by period start.
    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    /// Entries overlapping `range`, sorted by period start.
    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    fn period_cursor<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        Ok(boxed(self.entry_cursor()?.map(|e| e.into_parts().0)))
    }

    fn period_cursor_in<'a>(&'a self, range: &Period<I>) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        Ok(boxed(self.entry_cursor_in(range)?.map(|e| e.into_parts().0)))
    }

    // ── mutation ──

    /// Store a new entry. Fails if an entry with the same start exists.
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()>;

    /// Remove the entry stored under exactly `period`. Fails if absent.
    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()>;

    /// Remove every entry overlapping `range`; returns how many went.
    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize>;

    fn clear(&mut self) -> ChronosResult<()>;

    // ── atomic bracketing ──

    /// Hint that a group of mutations begins. Backends may ignore it.
    fn begin_atomic_operation(&mut self) -> ChronosResult<()> {
        Ok(())
    }

    fn end_atomic_operation(&mut self) -> ChronosResult<()> {
        Ok(())
    }
}

// ─── Box blanket impl ───────────────────────────────────────────────

impl<I, V, S> IAttributeStorage<I, V> for Box<S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V> + ?Sized,
{
    fn first_period(&self) -> ChronosResult<Period<I>> {
        (**self).first_period()
    }
    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        (**self).first_period_in(range)
    }
    fn last_period(&self) -> ChronosResult<Period<I>> {
        (**self).last_period()
    }
    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        (**self).last_period_in(range)
    }
    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        (**self).get_entry(instant)
    }
    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        (**self).get_entry_ending_at(instant)
    }
    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        (**self).get_entry_starting_at(instant)
    }
    fn get_value(&self, instant: &I) -> ChronosResult<Option<V>> {
        (**self).get_value(instant)
    }
    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>> {
        (**self).get_period(instant)
    }
    fn len(&self) -> ChronosResult<usize> {
        (**self).len()
    }
    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        (**self).len_in(range)
    }
    fn is_empty(&self) -> ChronosResult<bool> {
        (**self).is_empty()
    }
    fn is_empty_in(&self, range: &Period<I>) -> ChronosResult<bool> {
        (**self).is_empty_in(range)
    }
    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        (**self).contains_value(value)
    }
    fn contains_value_in(&self, value: &V, range: &Period<I>) -> ChronosResult<bool> {
        (**self).contains_value_in(value, range)
    }
    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        (**self).entry_cursor()
    }
    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        (**self).entry_cursor_in(range)
    }
    fn period_cursor<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        (**self).period_cursor()
    }
    fn period_cursor_in<'a>(&'a self, range: &Period<I>) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        (**self).period_cursor_in(range)
    }
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        (**self).put(period, value)
    }
    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        (**self).remove_entry(period)
    }
    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        (**self).remove_range(range)
    }
    fn clear(&mut self) -> ChronosResult<()> {
        (**self).clear()
    }
    fn begin_atomic_operation(&mut self) -> ChronosResult<()> {
        (**self).begin_atomic_operation()
    }
    fn end_atomic_operation(&mut self) -> ChronosResult<()> {
        (**self).end_atomic_operation()
    }
}
