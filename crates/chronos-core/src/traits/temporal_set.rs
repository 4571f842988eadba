//! `ITemporalSet` trait: the public face of a time-varying, multi-valued
//! association.

use std::hash::Hash;

use crate::cursor::BoxCursor;
use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::timed_object::TimedObject;

/// A function from time to a set of values, tracked per value.
pub trait ITemporalSet<I: Instant, V: Clone + Eq + Hash> {
    // ── reads ──

    fn get_period(&self, instant: &I, value: &V) -> ChronosResult<Option<Period<I>>>;
    fn contains(&self, instant: &I, value: &V) -> ChronosResult<bool>;
    fn contains_value(&self, value: &V) -> ChronosResult<bool>;

    fn len(&self) -> ChronosResult<usize>;
    fn len_for(&self, value: &V) -> ChronosResult<usize>;
    fn len_values(&self) -> ChronosResult<usize>;
    fn len_at(&self, instant: &I) -> ChronosResult<usize>;
    fn is_empty(&self) -> ChronosResult<bool>;
    fn is_empty_at(&self, instant: &I) -> ChronosResult<bool>;

    /// Fails with not-found when `value` has no period.
    fn first_period(&self, value: &V) -> ChronosResult<Period<I>>;
    fn last_period(&self, value: &V) -> ChronosResult<Period<I>>;

    fn first_instant(&self, value: &V) -> ChronosResult<I> {
        Ok(self.first_period(value)?.into_bounds().0)
    }

    fn last_instant(&self, value: &V) -> ChronosResult<I> {
        Ok(self.last_period(value)?.into_bounds().1)
    }

    fn extent(&self, value: &V) -> ChronosResult<Period<I>> {
        Period::new(self.first_instant(value)?, self.last_instant(value)?)
    }

    // ── iteration ──

    fn entries(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;
    fn values(&self) -> ChronosResult<BoxCursor<'_, V>>;
    fn values_at(&self, instant: &I) -> ChronosResult<BoxCursor<'_, V>>;
    fn periods_for(&self, value: &V) -> ChronosResult<BoxCursor<'_, Period<I>>>;

    // ── writes ──

    /// Add `value` over `period`. Returns whether `value` already held
    /// somewhere within `period`.
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<bool>;

    /// Clear `period` for `value` only.
    fn remove(&mut self, period: &Period<I>, value: &V) -> ChronosResult<bool>;

    /// Drop `value` entirely.
    fn remove_value(&mut self, value: &V) -> ChronosResult<bool>;

    /// Clear `period` for every value.
    fn remove_period(&mut self, period: &Period<I>) -> ChronosResult<bool>;

    fn clear(&mut self) -> ChronosResult<()>;

    fn put_all<T>(&mut self, other: &T) -> ChronosResult<bool>
    where
        Self: Sized,
        T: ITemporalSet<I, V> + ?Sized,
    {
        let entries: Vec<TimedObject<I, V>> = other.entries()?.collect();
        let mut overwritten = false;
        for entry in entries {
            let (period, value) = entry.into_parts();
            overwritten |= self.put(period, value)?;
        }
        Ok(overwritten)
    }

    fn content_eq<T>(&self, other: &T) -> ChronosResult<bool>
    where
        Self: Sized,
        T: ITemporalSet<I, V> + ?Sized,
    {
        if self.len()? != other.len()? || self.len_values()? != other.len_values()? {
            return Ok(false);
        }
        for entry in self.entries()? {
            let found = other.get_period(entry.period().start(), entry.value())?;
            if found.as_ref() != Some(entry.period()) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
