//! In-memory backing stores for the caches, with access counters.
//!
//! Both sources are cheap-to-clone handles over shared state, so a test can
//! hand one clone to a cache as loader, another as writer, and keep a third
//! to inspect what reached the store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chronos_cache::{
    LazyFill, MissingElementHandler, MissingRangeHandler, PointChangeHandler, PointFill,
    RangeChangeHandler,
};
use chronos_core::errors::ChronosResult;
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Period, Tick};
use chronos_storage::TreeAttributeStorage;

// ---------------------------------------------------------------------------
// Interval source
// ---------------------------------------------------------------------------

struct RangeState<V> {
    store: TreeAttributeStorage<Tick, V>,
    ranges: Vec<Period<Tick>>,
    ending_lookups: usize,
    writes: usize,
}

/// Backs a `LazyAttributeStorage`: serves ranges out of a tree storage and
/// applies the cache's writes to it.
pub struct RangeSource<V> {
    state: Rc<RefCell<RangeState<V>>>,
}

impl<V> Clone for RangeSource<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: Clone + PartialEq> RangeSource<V> {
    pub fn new(entries: impl IntoIterator<Item = (Period<Tick>, V)>) -> ChronosResult<Self> {
        let mut store = TreeAttributeStorage::new();
        for (period, value) in entries {
            store.put(period, value)?;
        }
        Ok(Self {
            state: Rc::new(RefCell::new(RangeState {
                store,
                ranges: Vec::new(),
                ending_lookups: 0,
                writes: 0,
            })),
        })
    }

    /// Ranges requested so far, in order.
    pub fn ranges(&self) -> Vec<Period<Tick>> {
        self.state.borrow().ranges.clone()
    }

    pub fn ending_lookups(&self) -> usize {
        self.state.borrow().ending_lookups
    }

    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    /// Current content of the backing store.
    pub fn stored(&self) -> Vec<(Period<Tick>, V)> {
        self.state
            .borrow()
            .store
            .iter()
            .map(|e| (e.period().clone(), e.value().clone()))
            .collect()
    }
}

impl<V: Clone + PartialEq> MissingRangeHandler<Tick, V> for RangeSource<V> {
    fn populate_range(&mut self, fill: &mut LazyFill<'_, Tick, V>, range: &Period<Tick>) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.ranges.push(range.clone());
        let entries: Vec<_> = state.store.entry_cursor_in(range)?.collect();
        for entry in entries {
            let (period, value) = entry.into_parts();
            fill.put_in_cache(period, value)?;
        }
        fill.populated(range)
    }

    fn populate_entry_ending_at(&mut self, fill: &mut LazyFill<'_, Tick, V>, instant: &Tick) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.ending_lookups += 1;
        if let Some(entry) = state.store.get_entry_ending_at(instant)? {
            let (period, value) = entry.into_parts();
            fill.put_in_cache(period, value)?;
        }
        Ok(())
    }
}

impl<V: Clone + PartialEq> RangeChangeHandler<Tick, V> for RangeSource<V> {
    fn put(&mut self, period: &Period<Tick>, value: &V) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.store.put(period.clone(), value.clone())
    }

    fn remove(&mut self, period: &Period<Tick>) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.store.remove_entry(period)
    }

    fn clear(&mut self) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.store.clear()
    }
}

// ---------------------------------------------------------------------------
// Point source
// ---------------------------------------------------------------------------

struct PointState<V> {
    values: BTreeMap<Tick, V>,
    prefetch: Option<Tick>,
    reads: usize,
    writes: usize,
}

/// Backs a `PointCache`. Optionally prefetches one extra instant on every
/// miss, the way a loader reading a whole page would.
pub struct PointSource<V> {
    state: Rc<RefCell<PointState<V>>>,
}

impl<V> Clone for PointSource<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: Clone> PointSource<V> {
    pub fn new(values: impl IntoIterator<Item = (Tick, V)>) -> Self {
        Self {
            state: Rc::new(RefCell::new(PointState {
                values: values.into_iter().collect(),
                prefetch: None,
                reads: 0,
                writes: 0,
            })),
        }
    }

    pub fn with_prefetch(self, instant: Tick) -> Self {
        self.state.borrow_mut().prefetch = Some(instant);
        self
    }

    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn stored(&self, instant: &Tick) -> Option<V> {
        self.state.borrow().values.get(instant).cloned()
    }
}

impl<V: Clone> MissingElementHandler<Tick, V> for PointSource<V> {
    fn populate_element(&mut self, fill: &mut PointFill<'_, Tick, V>, instant: &Tick) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.reads += 1;
        if let Some(value) = state.values.get(instant) {
            fill.put_in_cache(instant.clone(), Some(value.clone()));
        }
        if let Some(extra) = state.prefetch.clone().filter(|extra| extra != instant) {
            let value = state.values.get(&extra).cloned();
            fill.put_in_cache(extra, value);
        }
        Ok(())
    }
}

impl<V: Clone> PointChangeHandler<Tick, V> for PointSource<V> {
    fn put(&mut self, instant: &Tick, value: &V) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.values.insert(instant.clone(), value.clone());
        Ok(())
    }

    fn remove(&mut self, instant: &Tick) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.values.remove(instant);
        Ok(())
    }

    fn remove_period(&mut self, period: &Period<Tick>) -> ChronosResult<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        state.values.retain(|instant, _| !period.contains_instant(instant));
        Ok(())
    }
}
