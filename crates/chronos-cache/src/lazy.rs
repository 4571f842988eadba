//! Attribute storage loaded lazily, back to front, from a slower source.
//!
//! The cache holds a suffix of the timeline: everything from the *caching
//! limit* to positive infinity. A query reaching before the limit asks the
//! [`MissingRangeHandler`] for the missing range `[instant, limit)`, and the
//! handler answers by filling the cache through a [`LazyFill`] and
//! declaring the range populated. The first population must reach positive
//! infinity; later ones must end at or after the current limit, so the
//! cached suffix never has holes.
//!
//! Entries ending exactly at the limit are a special case: an entry
//! straddling the limit may start before it, so the handler is asked for it
//! separately and the answer is remembered until the limit moves.

use std::cell::{Ref, RefCell};

use chronos_core::cursor::{boxed, BoxCursor};
use chronos_core::errors::{CacheError, ChronosResult, TemporalError};
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Instant, Period, TimedObject};
use chronos_storage::TreeAttributeStorage;
use tracing::{debug, warn};

use crate::handler::NoChangeHandler;

struct LazyState<I, V> {
    cache: TreeAttributeStorage<I, V>,
    caching_limit: Option<I>,
    includes_ends_with_limit: bool,
}

impl<I: Instant, V: Clone + PartialEq> LazyState<I, V> {
    fn new() -> Self {
        Self {
            cache: TreeAttributeStorage::new(),
            caching_limit: None,
            includes_ends_with_limit: false,
        }
    }

    fn move_limit(&mut self, limit: I) {
        debug!(limit = ?limit, "caching limit moved");
        self.caching_limit = Some(limit);
        self.includes_ends_with_limit = false;
    }

    fn put_in_cache(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        // reloads around the limit may hand back an entry already cached
        if let Some(existing) = self.cache.get_entry_starting_at(period.start())? {
            if existing.period() == &period {
                return Ok(());
            }
        }
        let extends = match &self.caching_limit {
            None => true,
            Some(limit) => period.start() < limit && period.end() >= limit,
        };
        let start = period.start().clone();
        self.cache.put(period, value)?;
        if extends {
            self.move_limit(start);
        }
        Ok(())
    }

    fn populated(&mut self, range: &Period<I>) -> ChronosResult<()> {
        match &self.caching_limit {
            None => {
                if !range.end().is_positive_infinity() {
                    warn!(%range, "first population must reach positive infinity");
                    return Err(CacheError::NotPopulated(format!(
                        "first populated range {range} must end at positive infinity"
                    ))
                    .into());
                }
                self.move_limit(range.start().clone());
            }
            Some(limit) => {
                if range.end() < limit {
                    warn!(%range, limit = ?limit, "population gap");
                    return Err(CacheError::PopulationGap {
                        end: format!("{:?}", range.end()),
                        limit: format!("{limit:?}"),
                    }
                    .into());
                }
                if range.start() < limit {
                    self.move_limit(range.start().clone());
                }
            }
        }
        Ok(())
    }
}

/// Write access to the cache handed to a [`MissingRangeHandler`].
pub struct LazyFill<'a, I, V> {
    state: &'a mut LazyState<I, V>,
}

impl<I: Instant, V: Clone + PartialEq> LazyFill<'_, I, V> {
    /// Cache one entry from the backing store. An entry starting before the
    /// limit and reaching it lowers the limit to its start. An entry that is
    /// already cached under the same period is ignored.
    pub fn put_in_cache(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        self.state.put_in_cache(period, value)
    }

    /// Declare `range` fully loaded.
    pub fn populated(&mut self, range: &Period<I>) -> ChronosResult<()> {
        self.state.populated(range)
    }

    pub fn caching_limit(&self) -> Option<&I> {
        self.state.caching_limit.as_ref()
    }
}

/// Loads missing parts of the timeline.
pub trait MissingRangeHandler<I, V> {
    /// Put every entry overlapping `range` into the cache, then call
    /// [`LazyFill::populated`] with a range covering `range`.
    fn populate_range(&mut self, fill: &mut LazyFill<'_, I, V>, range: &Period<I>) -> ChronosResult<()>;

    /// Put the entry ending exactly at `instant`, if any, into the cache.
    fn populate_entry_ending_at(&mut self, fill: &mut LazyFill<'_, I, V>, instant: &I) -> ChronosResult<()>;
}

/// Persists writes made through the cache.
pub trait RangeChangeHandler<I, V> {
    fn put(&mut self, period: &Period<I>, value: &V) -> ChronosResult<()>;
    fn remove(&mut self, period: &Period<I>) -> ChronosResult<()>;
    fn clear(&mut self) -> ChronosResult<()>;
}

impl<I, V> RangeChangeHandler<I, V> for NoChangeHandler {
    fn put(&mut self, _period: &Period<I>, _value: &V) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }

    fn remove(&mut self, _period: &Period<I>) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }

    fn clear(&mut self) -> ChronosResult<()> {
        Err(CacheError::ReadOnly.into())
    }
}

pub struct LazyAttributeStorage<I, V, L, W = NoChangeHandler> {
    state: RefCell<LazyState<I, V>>,
    loader: RefCell<L>,
    writer: W,
}

impl<I, V, L> LazyAttributeStorage<I, V, L, NoChangeHandler>
where
    I: Instant,
    V: Clone + PartialEq,
    L: MissingRangeHandler<I, V>,
{
    pub fn read_only(loader: L) -> Self {
        Self::new(loader, NoChangeHandler)
    }
}

impl<I, V, L, W> LazyAttributeStorage<I, V, L, W>
where
    I: Instant,
    V: Clone + PartialEq,
    L: MissingRangeHandler<I, V>,
    W: RangeChangeHandler<I, V>,
{
    pub fn new(loader: L, writer: W) -> Self {
        Self {
            state: RefCell::new(LazyState::new()),
            loader: RefCell::new(loader),
            writer,
        }
    }

    /// Start of the cached suffix; `None` before the first population.
    pub fn caching_limit(&self) -> Option<I> {
        self.state.borrow().caching_limit.clone()
    }

    /// Push an entry into the cache outside of a handler callback.
    pub fn put_in_cache(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        self.state.get_mut().put_in_cache(period, value)
    }

    /// Declare `range` loaded outside of a handler callback.
    pub fn populated(&mut self, range: &Period<I>) -> ChronosResult<()> {
        self.state.get_mut().populated(range)
    }

    /// Forget everything loaded so far.
    pub fn clear_cache(&mut self) {
        *self.state.get_mut() = LazyState::new();
    }

    pub fn loader(&self) -> Ref<'_, L> {
        self.loader.borrow()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    fn populate(&self, range: &Period<I>) -> ChronosResult<()> {
        debug!(%range, "populating lazy cache");
        let mut state = self.state.borrow_mut();
        let mut fill = LazyFill { state: &mut *state };
        self.loader.borrow_mut().populate_range(&mut fill, range)
    }

    /// Load whatever is missing so that the cache covers `[instant, +inf)`.
    fn ensure_caching_since(&self, instant: &I) -> ChronosResult<()> {
        let limit = self.caching_limit();
        let missing = match &limit {
            None => true,
            Some(limit) => instant < limit,
        };
        if missing {
            let range = match limit {
                None if instant.is_positive_infinity() => Period::always(),
                None => Period::starting_at(instant.clone())?,
                Some(limit) => Period::new(instant.clone(), limit)?,
            };
            self.populate(&range)?;
        }
        match self.caching_limit() {
            Some(limit) if &limit <= instant => Ok(()),
            Some(limit) => {
                warn!(limit = ?limit, instant = ?instant, "loader stopped short of the requested instant");
                Err(CacheError::Handler(format!(
                    "cache starts at {limit:?} but {instant:?} was requested"
                ))
                .into())
            }
            None => {
                warn!(instant = ?instant, "loader populated nothing");
                Err(CacheError::Handler("the loader populated nothing".to_string()).into())
            }
        }
    }

    fn ensure_full_caching(&self) -> ChronosResult<()> {
        match self.caching_limit() {
            Some(limit) if limit.is_negative_infinity() => Ok(()),
            _ => self.ensure_caching_since(&I::negative_infinity()),
        }
    }

    fn cache(&self) -> Ref<'_, TreeAttributeStorage<I, V>> {
        Ref::map(self.state.borrow(), |s| &s.cache)
    }
}

impl<I, V, L, W> IAttributeStorage<I, V> for LazyAttributeStorage<I, V, L, W>
where
    I: Instant,
    V: Clone + PartialEq,
    L: MissingRangeHandler<I, V>,
    W: RangeChangeHandler<I, V>,
{
    fn first_period(&self) -> ChronosResult<Period<I>> {
        self.ensure_full_caching()?;
        self.cache().first_period()
    }

    fn first_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.ensure_caching_since(range.start())?;
        self.cache().first_period_in(range)
    }

    /// The last entry usually sits in the most recently loaded part, so a
    /// non-empty cache answers without a full load.
    fn last_period(&self) -> ChronosResult<Period<I>> {
        if self.caching_limit().is_none() {
            self.ensure_full_caching()?;
        }
        if !self.cache().is_empty()? {
            return self.cache().last_period();
        }
        if self.caching_limit().is_some_and(|l| l.is_negative_infinity()) {
            return Err(TemporalError::NotFound("storage is empty".to_string()).into());
        }
        self.ensure_full_caching()?;
        self.cache().last_period()
    }

    fn last_period_in(&self, range: &Period<I>) -> ChronosResult<Period<I>> {
        self.ensure_caching_since(range.start())?;
        self.cache().last_period_in(range)
    }

    fn get_entry(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.ensure_caching_since(instant)?;
        self.cache().get_entry(instant)
    }

    fn get_entry_ending_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.ensure_caching_since(instant)?;
        let needs_lookup = {
            let state = self.state.borrow();
            state.caching_limit.as_ref() == Some(instant) && !state.includes_ends_with_limit
        };
        if needs_lookup {
            let mut state = self.state.borrow_mut();
            let mut fill = LazyFill { state: &mut *state };
            self.loader
                .borrow_mut()
                .populate_entry_ending_at(&mut fill, instant)?;
            if state.caching_limit.as_ref() == Some(instant) {
                state.includes_ends_with_limit = true;
            }
        }
        self.cache().get_entry_ending_at(instant)
    }

    fn get_entry_starting_at(&self, instant: &I) -> ChronosResult<Option<TimedObject<I, V>>> {
        self.ensure_caching_since(instant)?;
        self.cache().get_entry_starting_at(instant)
    }

    fn len(&self) -> ChronosResult<usize> {
        self.ensure_full_caching()?;
        self.cache().len()
    }

    fn len_in(&self, range: &Period<I>) -> ChronosResult<usize> {
        self.ensure_caching_since(range.start())?;
        self.cache().len_in(range)
    }

    fn is_empty(&self) -> ChronosResult<bool> {
        self.ensure_full_caching()?;
        self.cache().is_empty()
    }

    fn is_empty_in(&self, range: &Period<I>) -> ChronosResult<bool> {
        self.ensure_caching_since(range.start())?;
        self.cache().is_empty_in(range)
    }

    fn contains_value(&self, value: &V) -> ChronosResult<bool> {
        self.ensure_full_caching()?;
        self.cache().contains_value(value)
    }

    fn contains_value_in(&self, value: &V, range: &Period<I>) -> ChronosResult<bool> {
        self.ensure_caching_since(range.start())?;
        self.cache().contains_value_in(value, range)
    }

    // Cursors snapshot the cache so no borrow of the cell escapes.

    fn entry_cursor(&self) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.ensure_full_caching()?;
        let entries: Vec<_> = self.cache().iter().cloned().collect();
        Ok(boxed(entries.into_iter()))
    }

    fn entry_cursor_in(&self, range: &Period<I>) -> ChronosResult<BoxCursor<'_, TimedObject<I, V>>> {
        self.ensure_caching_since(range.start())?;
        let entries: Vec<_> = self.cache().entry_cursor_in(range)?.collect();
        Ok(boxed(entries.into_iter()))
    }

    fn put(&mut self, period: Period<I>, value: V) -> ChronosResult<()> {
        self.ensure_caching_since(period.start())?;
        self.writer.put(&period, &value)?;
        self.state.get_mut().cache.put(period, value)
    }

    fn remove_entry(&mut self, period: &Period<I>) -> ChronosResult<()> {
        self.ensure_caching_since(period.start())?;
        self.writer.remove(period)?;
        self.state.get_mut().cache.remove_entry(period)
    }

    fn remove_range(&mut self, range: &Period<I>) -> ChronosResult<usize> {
        self.ensure_caching_since(range.start())?;
        let doomed: Vec<Period<I>> = self.cache().period_cursor_in(range)?.collect();
        for period in &doomed {
            self.writer.remove(period)?;
            self.state.get_mut().cache.remove_entry(period)?;
        }
        Ok(doomed.len())
    }

    /// Clears the backing store through the writer; the cache then knows the
    /// whole timeline to be empty.
    fn clear(&mut self) -> ChronosResult<()> {
        self.writer.clear()?;
        let state = self.state.get_mut();
        state.cache.clear()?;
        state.move_limit(I::negative_infinity());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;

    /// Serves a fixed timeline, loading exactly the requested range.
    struct Fixed {
        entries: Vec<(Period<Tick>, char)>,
        ranges: Vec<Period<Tick>>,
    }

    impl Fixed {
        fn new(entries: Vec<(Period<Tick>, char)>) -> Self {
            Self {
                entries,
                ranges: Vec::new(),
            }
        }
    }

    impl MissingRangeHandler<Tick, char> for Fixed {
        fn populate_range(
            &mut self,
            fill: &mut LazyFill<'_, Tick, char>,
            range: &Period<Tick>,
        ) -> ChronosResult<()> {
            self.ranges.push(range.clone());
            for (period, value) in &self.entries {
                if period.overlaps(range) {
                    fill.put_in_cache(period.clone(), *value)?;
                }
            }
            fill.populated(range)
        }

        fn populate_entry_ending_at(
            &mut self,
            fill: &mut LazyFill<'_, Tick, char>,
            instant: &Tick,
        ) -> ChronosResult<()> {
            for (period, value) in &self.entries {
                if period.end() == instant {
                    fill.put_in_cache(period.clone(), *value)?;
                }
            }
            Ok(())
        }
    }

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    fn storage() -> LazyAttributeStorage<Tick, char, Fixed> {
        LazyAttributeStorage::read_only(Fixed::new(vec![
            (p(0, 10), 'a'),
            (p(10, 20), 'b'),
            (p(30, 40), 'c'),
        ]))
    }

    #[test]
    fn test_point_read_loads_suffix_only() {
        let s = storage();
        assert_eq!(s.get_value(&Tick::At(35)).unwrap(), Some('c'));
        // the straddling entry lowered the limit to its start
        assert_eq!(s.caching_limit(), Some(Tick::At(30)));
        assert_eq!(s.get_value(&Tick::At(15)).unwrap(), Some('b'));
        assert_eq!(s.caching_limit(), Some(Tick::At(15)));
        assert_eq!(
            s.loader().ranges,
            vec![Period::starting_at(Tick::At(35)).unwrap(), p(15, 30)]
        );
    }

    #[test]
    fn test_full_queries_load_everything() {
        let s = storage();
        assert_eq!(s.len().unwrap(), 3);
        assert_eq!(s.caching_limit(), Some(Tick::NegativeInfinity));
        assert_eq!(s.first_period().unwrap(), p(0, 10));
        assert_eq!(s.loader().ranges.len(), 1);
    }

    #[test]
    fn test_entry_ending_at_limit_asks_loader() {
        let s = storage();
        s.get_value(&Tick::At(20)).unwrap();
        assert_eq!(s.caching_limit(), Some(Tick::At(20)));
        let ending = s.get_entry_ending_at(&Tick::At(20)).unwrap().unwrap();
        assert_eq!(ending.value(), &'b');
        assert_eq!(s.caching_limit(), Some(Tick::At(10)));
    }

    #[test]
    fn test_last_period_quick_win() {
        let s = storage();
        s.get_value(&Tick::At(35)).unwrap();
        assert_eq!(s.last_period().unwrap(), p(30, 40));
        assert_eq!(s.loader().ranges.len(), 1);
        assert_eq!(s.caching_limit(), Some(Tick::At(30)));
    }

    #[test]
    fn test_read_only_writes_fail() {
        let mut s = storage();
        assert!(s.put(p(50, 60), 'z').unwrap_err().is_unsupported());
        assert!(s.clear().is_err());
    }

    /// Answers every request without declaring anything populated.
    struct Silent;

    impl MissingRangeHandler<Tick, char> for Silent {
        fn populate_range(&mut self, _fill: &mut LazyFill<'_, Tick, char>, _range: &Period<Tick>) -> ChronosResult<()> {
            Ok(())
        }

        fn populate_entry_ending_at(&mut self, _fill: &mut LazyFill<'_, Tick, char>, _instant: &Tick) -> ChronosResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_silent_loader_is_a_handler_error() {
        let s = LazyAttributeStorage::<Tick, char, Silent>::read_only(Silent);
        let err = s.get_value(&Tick::At(5)).unwrap_err();
        assert!(matches!(
            err,
            chronos_core::errors::ChronosError::CacheError(CacheError::Handler(_))
        ));
        assert_eq!(s.caching_limit(), None);
    }

    #[test]
    fn test_gap_is_rejected() {
        let mut s = storage();
        s.populated(&Period::starting_at(Tick::At(30)).unwrap()).unwrap();
        assert!(s.populated(&p(0, 10)).is_err());
        s.populated(&p(0, 30)).unwrap();
        assert_eq!(s.caching_limit(), Some(Tick::At(0)));
    }
}
