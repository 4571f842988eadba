//! `ITemporalAttribute` trait: the public face of a time-varying,
//! single-valued association.

use crate::cursor::{boxed, BoxCursor};
use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::timed_object::TimedObject;

/// A function from time to at most one value.
///
/// After every successful write no two stored periods overlap, and no two
/// adjacent periods carry equal values.
pub trait ITemporalAttribute<I: Instant, V: Clone + PartialEq> {
    // ── point reads ──

    fn get(&self, instant: &I) -> ChronosResult<Option<V>>;
    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>>;
    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>>;

    fn contains_instant(&self, instant: &I) -> ChronosResult<bool> {
        Ok(self.get_period(instant)?.is_some())
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool>;

    // ── extent ──

    fn len(&self) -> ChronosResult<usize>;
    fn is_empty(&self) -> ChronosResult<bool>;

    /// Fails with not-found when empty.
    fn first_period(&self) -> ChronosResult<Period<I>>;
    fn last_period(&self) -> ChronosResult<Period<I>>;

    fn first_instant(&self) -> ChronosResult<I> {
        Ok(self.first_period()?.into_bounds().0)
    }

    fn last_instant(&self) -> ChronosResult<I> {
        Ok(self.last_period()?.into_bounds().1)
    }

    /// From the first instant to the last one, gaps included.
    fn extent(&self) -> ChronosResult<Period<I>> {
        Period::new(self.first_instant()?, self.last_instant()?)
    }

    // ── iteration ──

    fn entries(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>>;

    fn periods<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        Ok(boxed(self.entries()?.map(|e| e.into_parts().0)))
    }

    // ── writes ──

    /// Associate `value` with `period`, overwriting what was there.
    /// Returns whether anything was stored under `period` beforehand.
    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<bool>;

    /// Clear `period`. Returns whether anything was removed.
    fn remove(&mut self, period: &Period<I>) -> ChronosResult<bool>;

    fn clear(&mut self) -> ChronosResult<()>;

    /// Copy every entry of `other` in. Returns true if any put overwrote.
    fn put_all<A>(&mut self, other: &A) -> ChronosResult<bool>
    where
        Self: Sized,
        A: ITemporalAttribute<I, V> + ?Sized,
    {
        let entries: Vec<TimedObject<I, V>> = other.entries()?.collect();
        let mut overwritten = false;
        for entry in entries {
            let (period, value) = entry.into_parts();
            overwritten |= self.put(period, value)?;
        }
        Ok(overwritten)
    }

    /// Same periods carrying the same values.
    fn content_eq<A>(&self, other: &A) -> ChronosResult<bool>
    where
        Self: Sized,
        A: ITemporalAttribute<I, V> + ?Sized,
    {
        if self.len()? != other.len()? {
            return Ok(false);
        }
        for entry in self.entries()? {
            if other.get_entry(entry.period().start())?.as_ref() != Some(&entry) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
