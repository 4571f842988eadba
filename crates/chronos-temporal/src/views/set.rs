use std::hash::Hash;
use std::marker::PhantomData;

use chronos_core::cursor::BoxCursor;
use chronos_core::errors::{ChronosResult, TemporalError};
use chronos_core::traits::ITemporalSet;
use chronos_core::{Instant, Period, TimedObject};

use super::refuse_insert;

/// The periods during which one value belongs to a set.
pub struct ValuePeriodSet<'a, I, V, T: ?Sized> {
    owner: &'a mut T,
    value: V,
    _instant: PhantomData<fn() -> I>,
}

impl<'a, I, V, T> ValuePeriodSet<'a, I, V, T>
where
    I: Instant,
    V: Clone + Eq + Hash,
    T: ITemporalSet<I, V> + ?Sized,
{
    pub fn new(owner: &'a mut T, value: V) -> Self {
        Self {
            owner,
            value,
            _instant: PhantomData,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn len(&self) -> ChronosResult<usize> {
        self.owner.len_for(&self.value)
    }

    pub fn is_empty(&self) -> ChronosResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn iter(&self) -> ChronosResult<BoxCursor<'_, Period<I>>> {
        self.owner.periods_for(&self.value)
    }

    pub fn contains(&self, period: &Period<I>) -> ChronosResult<bool> {
        let stored = self.owner.get_period(period.start(), &self.value)?;
        Ok(stored.as_ref() == Some(period))
    }

    pub fn contains_instant(&self, instant: &I) -> ChronosResult<bool> {
        self.owner.contains(instant, &self.value)
    }

    pub fn insert(&mut self, _period: Period<I>) -> ChronosResult<bool> {
        Err(refuse_insert("value period set"))
    }

    /// Clear `period` for this value.
    pub fn remove(&mut self, period: &Period<I>) -> ChronosResult<bool> {
        self.owner.remove(period, &self.value)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Period<I>) -> bool) -> ChronosResult<usize> {
        let doomed: Vec<Period<I>> = self.iter()?.filter(|p| !keep(p)).collect();
        for period in &doomed {
            self.owner.remove(period, &self.value)?;
        }
        Ok(doomed.len())
    }

    /// Drops the value from the set.
    pub fn clear(&mut self) -> ChronosResult<()> {
        self.owner.remove_value(&self.value).map(drop)
    }
}

/// The distinct values a set has ever held.
pub struct ValueSet<'a, I, V, T: ?Sized> {
    owner: &'a mut T,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<'a, I, V, T> ValueSet<'a, I, V, T>
where
    I: Instant,
    V: Clone + Eq + Hash,
    T: ITemporalSet<I, V> + ?Sized,
{
    pub fn new(owner: &'a mut T) -> Self {
        Self {
            owner,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> ChronosResult<usize> {
        self.owner.len_values()
    }

    pub fn is_empty(&self) -> ChronosResult<bool> {
        self.owner.is_empty()
    }

    pub fn iter(&self) -> ChronosResult<BoxCursor<'_, V>> {
        self.owner.values()
    }

    pub fn contains(&self, value: &V) -> ChronosResult<bool> {
        self.owner.contains_value(value)
    }

    pub fn insert(&mut self, _value: V) -> ChronosResult<bool> {
        Err(refuse_insert("value set"))
    }

    pub fn remove(&mut self, value: &V) -> ChronosResult<bool> {
        self.owner.remove_value(value)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) -> ChronosResult<usize> {
        let doomed: Vec<V> = self.iter()?.filter(|v| !keep(v)).collect();
        for value in &doomed {
            self.owner.remove_value(value)?;
        }
        Ok(doomed.len())
    }

    pub fn clear(&mut self) -> ChronosResult<()> {
        self.owner.clear()
    }
}

/// The values holding at one instant. Read-only: removing a value needs a
/// period, which an instant does not provide.
pub struct ValueSetAt<'a, I, V, T: ?Sized> {
    owner: &'a T,
    instant: I,
    _value: PhantomData<fn() -> V>,
}

impl<'a, I, V, T> ValueSetAt<'a, I, V, T>
where
    I: Instant,
    V: Clone + Eq + Hash,
    T: ITemporalSet<I, V> + ?Sized,
{
    pub fn new(owner: &'a T, instant: I) -> Self {
        Self {
            owner,
            instant,
            _value: PhantomData,
        }
    }

    pub fn instant(&self) -> &I {
        &self.instant
    }

    pub fn len(&self) -> ChronosResult<usize> {
        self.owner.len_at(&self.instant)
    }

    pub fn is_empty(&self) -> ChronosResult<bool> {
        self.owner.is_empty_at(&self.instant)
    }

    pub fn iter(&self) -> ChronosResult<BoxCursor<'_, V>> {
        self.owner.values_at(&self.instant)
    }

    pub fn contains(&self, value: &V) -> ChronosResult<bool> {
        self.owner.contains(&self.instant, value)
    }

    pub fn insert(&mut self, _value: V) -> ChronosResult<bool> {
        Err(refuse_insert("value set at an instant"))
    }

    pub fn remove(&mut self, _value: &V) -> ChronosResult<bool> {
        Err(TemporalError::Unsupported("a period must be specified to remove a value".to_string()).into())
    }

    pub fn clear(&mut self) -> ChronosResult<()> {
        Err(TemporalError::Unsupported("an instant cannot be cleared".to_string()).into())
    }
}

/// Every `(period, value)` pair of a set.
pub struct SetEntrySet<'a, I, V, T: ?Sized> {
    owner: &'a mut T,
    _marker: PhantomData<fn() -> (I, V)>,
}

impl<'a, I, V, T> SetEntrySet<'a, I, V, T>
where
    I: Instant,
    V: Clone + Eq + Hash,
    T: ITemporalSet<I, V> + ?Sized,
{
    pub fn new(owner: &'a mut T) -> Self {
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
        let stored = self.owner.get_period(entry.period().start(), entry.value())?;
        Ok(stored.as_ref() == Some(entry.period()))
    }

    pub fn insert(&mut self, _entry: TimedObject<I, V>) -> ChronosResult<bool> {
        Err(refuse_insert("entry set"))
    }

    pub fn remove(&mut self, entry: &TimedObject<I, V>) -> ChronosResult<bool> {
        if !self.contains(entry)? {
            return Ok(false);
        }
        self.owner.remove(entry.period(), entry.value())
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&TimedObject<I, V>) -> bool) -> ChronosResult<usize> {
        let doomed: Vec<TimedObject<I, V>> = self.iter()?.filter(|e| !keep(e)).collect();
        for entry in &doomed {
            self.owner.remove(entry.period(), entry.value())?;
        }
        Ok(doomed.len())
    }

    pub fn clear(&mut self) -> ChronosResult<()> {
        self.owner.clear()
    }
}
