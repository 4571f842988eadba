use std::marker::PhantomData;

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::ChronosResult;
use chronos_core::traits::ITemporalAttribute;
use chronos_core::{Instant, Period, TimedObject};

use super::refuse_insert;

/// The periods of an attribute, as a set.
pub struct PeriodSet<'a, I, V, A: ?Sized> {
    owner: &'a mut A,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<'a, I, V, A> PeriodSet<'a, I, V, A>
where
    I: Instant,
    V: Clone + PartialEq,
    A: ITemporalAttribute<I, V> + ?Sized,
{
    pub fn new(owner: &'a mut A) -> Self {
        Self {
            owner,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> ChronosResult<usize> {
        self.owner.len()
    }

    pub fn is_empty(&self) -> ChronosResult<bool> {
        self.owner.is_empty()
    }

    pub fn iter(&self) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        self.owner.periods()
    }

    /// True when `period` is stored exactly.
    pub fn contains(&self, period: &Period<I>) -> ChronosResult<bool> {
        Ok(self.owner.get_period(period.start())?.as_ref() == Some(period))
    }

    pub fn contains_instant(&self, instant: &I) -> ChronosResult<bool> {
        self.owner.contains_instant(instant)
    }

    pub fn insert(&mut self, _period: Period<I>) -> ChronosResult<bool> {
        Err(refuse_insert("period set"))
    }

    /// Remove `period` if it is stored exactly.
    pub fn remove(&mut self, period: &Period<I>) -> ChronosResult<bool> {
        if !self.contains(period)? {
            return Ok(false);
        }
        self.owner.remove(period)
    }

    /// Keep only the periods `keep` accepts; returns how many went.
    pub fn retain(&mut self, mut keep: impl FnMut(&Period<I>) -> bool) -> ChronosResult<usize> {
        let doomed: Vec<Period<I>> = self.iter()?.filter(|p| !keep(p)).collect();
        for period in &doomed {
            self.owner.remove(period)?;
        }
        Ok(doomed.len())
    }

    pub fn clear(&mut self) -> ChronosResult<()> {
        self.owner.clear()
    }
}

/// The entries of an attribute, as a set.
pub struct EntrySet<'a, I, V, A: ?Sized> {
    owner: &'a mut A,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<'a, I, V, A> EntrySet<'a, I, V, A>
where
    I: Instant,
    V: Clone + PartialEq,
    A: ITemporalAttribute<I, V> + ?Sized,
{
    pub fn new(owner: &'a mut A) -> Self {
        Self {
            owner,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> ChronosResult<usize> {
        self.owner.len()
    }

    pub fn is_empty(&self) -> ChronosResult<bool> {
        self.owner.is_empty()
    }

    pub fn iter(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.owner.entries()
    }

    pub fn contains(&self, entry: &TimedObject<I, V>) -> ChronosResult<bool> {
        Ok(self.owner.get_entry(entry.period().start())?.as_ref() == Some(entry))
    }

    pub fn insert(&mut self, _entry: TimedObject<I, V>) -> ChronosResult<bool> {
        Err(refuse_insert("entry set"))
    }

    pub fn remove(&mut self, entry: &TimedObject<I, V>) -> ChronosResult<bool> {
        if !self.contains(entry)? {
            return Ok(false);
        }
        self.owner.remove(entry.period())
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&TimedObject<I, V>) -> bool) -> ChronosResult<usize> {
        let doomed: Vec<Period<I>> = self
            .iter()?
            .filter(|e| !keep(e))
            .map(|e| e.into_parts().0)
            .collect();
        for period in &doomed {
            self.owner.remove(period)?;
        }
        Ok(doomed.len())
    }

    pub fn clear(&mut self) -> ChronosResult<()> {
        self.owner.clear()
    }
}
