//! `ISetStorage` trait: storage contract for multi-valued temporal sets.
//!
//! A set storage keeps, per value, an independent collection of
//! non-overlapping periods. Periods of different values may overlap freely.

use std::hash::Hash;

use crate::cursor::BoxCursor;
use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::timed_object::TimedObject;

// ─── Trait ───────────────────────────────────────────────────────────

/// Raw storage behind a temporal set.
///
/// Value-scoped boundary lookups answer `Ok(None)` for unknown values;
/// `first_period`/`last_period` fail with a not-found error instead.
pub trait ISetStorage<I: Instant, V: Clone + Eq + Hash> {
    // ── value-scoped queries ──

    fn first_period(&self, value: &V) -> ChronosResult<Period<I>>;

    fn last_period(&self, value: &V) -> ChronosResult<Period<I>>;

    /// The period of `value` containing `instant`.
    fn get_period(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>>;

    fn get_period_ending_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>>;

    fn get_period_starting_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>>;

    fn contains_value(&self, value: &V) -> ChronosResult<bool>;

    fn contains_value_at(&self, instant: &I, value: &V) -> ChronosResult<bool> {
        Ok(self.get_period(instant, value)?.is_some())
    }

    // ── sizes ──

    /// Total number of stored `(period, value)` pairs.
    fn len(&self) -> ChronosResult<usize>;

    fn len_for(&self, value: &V) -> ChronosResult<usize>;

    /// Number of distinct values.
    fn len_values(&self) -> ChronosResult<usize>;

    /// Number of values holding at `instant`.
    fn len_at(&self, instant: &I) -> ChronosResult<usize>;

    fn is_empty(&self) -> ChronosResult<bool> {
        Ok(self.len()? == 0)
    }

    fn is_empty_at(&self, instant: &I) -> ChronosResult<bool> {
        Ok(self.len_at(instant)? == 0)
    }

    // ── cursors ──

    /// All entries, sorted by period.
    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    /// Entries whose period contains `instant`.
    fn entry_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    /// Entries overlapping `range`, sorted by period.
    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    fn period_cursor_for(&self, value: &V) -> ChronosResult<BoxCursor<'_, Period<I>>>;

    fn period_cursor_for_in(
        &self,
        range: &Period<I>,
        value: &V,
    ) -> ChronosResult<BoxCursor<'_, Period<I>>>;

    fn value_cursor(&self) -> ChronosResult<BoxCursor<'_, V>>;

    /// Values holding at `instant`.
    fn value_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, V>>;

    // ── mutation ──

    /// Store `period` for `value`. Fails if `value` already has a period
    /// with the same start.
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()>;

    /// Remove exactly `period` from `value`'s collection. Fails if absent.
    fn remove(&mut self, period: &Period<I>, value: &V) -> ChronosResult<()>;

    /// Remove every period of `value` overlapping `range`; returns how many went.
    fn remove_range_for(&mut self, range: &Period<I>, value: &V) -> ChronosResult<usize>;

    /// Drop `value`'s whole collection. Returns whether it had any period.
    fn remove_value(&mut self, value: &V) -> ChronosResult<bool>;

    fn clear(&mut self) -> ChronosResult<()>;

    // ── atomic bracketing ──

    fn begin_atomic_operation(&mut self) -> ChronosResult<()> {
        Ok(())
    }

    fn end_atomic_operation(&mut self) -> ChronosResult<()> {
        Ok(())
    }
}

// ─── Box blanket impl ───────────────────────────────────────────────

impl<I, V, S> ISetStorage<I, V> for Box<S>
where
    I: Instant,
    V: Clone + Eq + Hash,
    S: ISetStorage<I, V> + ?Sized,
{
    fn first_period(&self, value: &V) -> ChronosResult<Period<I>> {
        (**self).first_period(value)
    }
    fn last_period(&self, value: &V) -> ChronosResult<Period<I>> {
        (**self).last_period(value)
    }
    fn get_period(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        (**self).get_period(instant, value)
    }
    fn get_period_ending_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        (**self).get_period_ending_at(instant, value)
    }
    fn get_period_starting_at(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>> {
        (**self).get_period_starting_at(instant, value)
    }
    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        (**self).contains_value(value)
    }
    fn contains_value_at(&self, instant: &I, value: &V) -> ChronosResult<bool> {
        (**self).contains_value_at(instant, value)
    }
    fn len(&self) -> ChronosResult<usize> {
        (**self).len()
    }
    fn len_for(&self, value: &V) -> ChronosResult<usize> {
        (**self).len_for(value)
    }
    fn len_values(&self) -> ChronosResult<usize> {
        (**self).len_values()
    }
    fn len_at(&self, instant: &I) -> ChronosResult<usize> {
        (**self).len_at(instant)
    }
    fn is_empty(&self) -> ChronosResult<bool> {
        (**self).is_empty()
    }
    fn is_empty_at(&self, instant: &I) -> ChronosResult<bool> {
        (**self).is_empty_at(instant)
    }
    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        (**self).entry_cursor()
    }
    fn entry_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        (**self).entry_cursor_at(instant)
    }
    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        (**self).entry_cursor_in(range)
    }
    fn period_cursor_for(&self, value: &V) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        (**self).period_cursor_for(value)
    }
    fn period_cursor_for_in(
        &self,
        range: &Period<I>,
        value: &V,
    ) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        (**self).period_cursor_for_in(range, value)
    }
    fn value_cursor(&self) -> ChronosResult<BoxCursor<'_, V>> {
        (**self).value_cursor()
    }
    fn value_cursor_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, V>> {
        (**self).value_cursor_at(instant)
    }
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        (**self).put(period, value)
    }
    fn remove(&mut self, period: &Period<I>, value: &V) -> ChronosResult<()> {
        (**self).remove(period, value)
    }
    fn remove_range_for(&mut self, range: &Period<I>, value: &V) -> ChronosResult<usize> {
        (**self).remove_range_for(range, value)
    }
    fn remove_value(&mut self, value: &V) -> ChronosResult<bool> {
        (**self).remove_value(value)
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
