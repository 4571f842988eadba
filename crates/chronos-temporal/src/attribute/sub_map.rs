use std::borrow::Cow;

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{ChronosResult, TemporalError};
use chronos_core::traits::{IAttributeStorage, ITemporalAttribute};
use chronos_core::{Instant, Intersection, Period, TimedObject};

use super::TemporalAttribute;
use crate::views::{EntrySet, PeriodSet};

/// A range-restricted window onto a [`TemporalAttribute`].
///
/// Periods and entries read through the window are clipped to its range.
/// Instant reads outside the range and writes not contained in it fail
/// with an out-of-range error; everything else delegates to the parent.
pub struct SubMap<'a, I, V, S> {
    parent: &'a mut TemporalAttribute<I, V, S>,
    range: Period<I>,
}

fn clip<I: Instant>(period: &Period<I>, range: &Period<I>) -> Option<Period<I>> {
    period.intersect(range).map(Intersection::into_period)
}

impl<'a, I, V, S> SubMap<'a, I, V, S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V>,
{
    pub(crate) fn new(parent: &'a mut TemporalAttribute<I, V, S>, range: Period<I>) -> Self {
        Self { parent, range }
    }

    pub fn range(&self) -> &Period<I> {
        &self.range
    }

    /// A narrower window. `range` must lie inside this one.
    pub fn sub_map(&mut self, range: Period<I>) -> ChronosResult<SubMap<'_, I, V, S>> {
        if !self.range.contains(&range) {
            return Err(self.out_of_range(&range).into());
        }
        Ok(SubMap::new(self.parent, range))
    }

    pub fn period_set(&mut self) -> PeriodSet<'_, I, V, Self> {
        PeriodSet::new(self)
    }

    pub fn entry_set(&mut self) -> EntrySet<'_, I, V, Self> {
        EntrySet::new(self)
    }

    fn storage(&self) -> &S {
        self.parent.storage()
    }

    fn out_of_range(&self, what: &dyn std::fmt::Display) -> TemporalError {
        TemporalError::OutOfRange(format!("{what} is outside {}", self.range))
    }

    fn check_instant(&self, instant: &I) -> ChronosResult<()> {
        if self.range.contains_instant(instant) {
            Ok(())
        } else {
            Err(TemporalError::OutOfRange(format!("{instant:?} is outside {}", self.range)).into())
        }
    }

    fn check_period(&self, period: &Period<I>) -> ChronosResult<()> {
        if self.range.contains(period) {
            Ok(())
        } else {
            Err(self.out_of_range(period).into())
        }
    }
}

impl<I, V, S> ITemporalAttribute<I, V> for SubMap<'_, I, V, S>
where
    I: Instant,
    V: Clone + PartialEq,
    S: IAttributeStorage<I, V>,
{
    fn get(&self, instant: &I) -> ChronosResult<Option<V>> {
        self.check_instant(instant)?;
        self.parent.get(instant)
    }

    fn get_period(&self, instant: &I) -> ChronosResult<Option<Period<I>>> {
        self.check_instant(instant)?;
        Ok(self
            .parent
            .get_period(instant)?
            .and_then(|p| clip(&p, &self.range)))
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.check_instant(instant)?;
        let entry = self.parent.get_entry(instant)?;
        Ok(entry.and_then(|e| e.intersect(&self.range).map(Cow::into_owned)))
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.storage().contains_value_in(value, &self.range)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.storage().len_in(&self.range)
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.storage().is_empty_in(&self.range)
    }

    fn first_period(&self) -> ChronosResult<Period<I>> {
        let first = self.storage().first_period_in(&self.range)?;
        clip(&first, &self.range)
            .ok_or_else(|| TemporalError::NotFound(format!("nothing stored in {}", self.range)).into())
    }

    fn last_period(&self) -> ChronosResult<Period<I>> {
        let last = self.storage().last_period_in(&self.range)?;
        clip(&last, &self.range)
            .ok_or_else(|| TemporalError::NotFound(format!("nothing stored in {}", self.range)).into())
    }

    fn entries(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        let range = self.range.clone();
        let cursor = self.storage().entry_cursor_in(&self.range)?;
        Ok(boxed(cursor.filter_map(move |e| {
            e.intersect(&range).map(Cow::into_owned)
        })))
    }

    fn periods<'a>(&'a self) -> ChronosResult<BoxCursor<'a, Period<I>>>
    where
        I: 'a,
        V: 'a,
    {
        let range = self.range.clone();
        let cursor = self.storage().period_cursor_in(&self.range)?;
        Ok(boxed(cursor.filter_map(move |p| clip(&p, &range))))
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<bool> {
        self.check_period(&period)?;
        self.parent.put(period, value)
    }

    fn remove(&mut self, period: &Period<I>) -> ChronosResult<bool> {
        self.check_period(period)?;
        self.parent.remove(period)
    }

    /// Removes the whole range from the parent.
    fn clear(&mut self) -> ChronosResult<()> {
        self.parent.remove(&self.range).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;
    use chronos_storage::TreeAttributeStorage;

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    #[test]
    fn test_reads_are_clipped() {
        let mut attr = TemporalAttribute::new(TreeAttributeStorage::new());
        attr.put(p(0, 10), 'a').unwrap();
        attr.put(p(10, 20), 'b').unwrap();

        let window = attr.sub_map(p(5, 15));
        assert_eq!(window.get_period(&Tick::At(6)).unwrap(), Some(p(5, 10)));
        assert_eq!(window.first_period().unwrap(), p(5, 10));
        assert_eq!(window.last_period().unwrap(), p(10, 15));
        assert_eq!(window.len().unwrap(), 2);
        assert!(window.get(&Tick::At(15)).is_err());
    }

    #[test]
    fn test_nested_window_must_fit() {
        let mut attr: TemporalAttribute<Tick, char, TreeAttributeStorage<Tick, char>> = TemporalAttribute::default();
        let mut window = attr.sub_map(p(0, 10));
        assert!(window.sub_map(p(5, 12)).is_err());
        let mut inner = window.sub_map(p(2, 4)).unwrap();
        inner.put(p(2, 3), 'z').unwrap();
        assert!(inner.put(p(1, 3), 'z').is_err());
        assert_eq!(attr.get(&Tick::At(2)).unwrap(), Some('z'));
    }
}
