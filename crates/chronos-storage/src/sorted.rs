//! Lookups over collections sorted by period start.
//!
//! Every backend keys its entries by start instant. Since stored periods
//! never overlap, the entry containing an instant is the last one starting
//! at or before it, and the entries overlapping a range are those from the
//! one containing `range.start` up to the last one starting before `range.end`.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;

use chronos_core::{Instant, Period, TimedObject};

/// Anything stored under its period's start.
pub(crate) trait HasPeriod<I> {
    fn period(&self) -> &Period<I>;
}

impl<I> HasPeriod<I> for Period<I> {
    fn period(&self) -> &Period<I> {
        self
    }
}

impl<I: Instant, V> HasPeriod<I> for TimedObject<I, V> {
    fn period(&self) -> &Period<I> {
        TimedObject::period(self)
    }
}

// ─── BTreeMap ───────────────────────────────────────────────────────

pub(crate) fn tree_containing<'a, I: Instant, T: HasPeriod<I>>(
    map: &'a BTreeMap<I, T>,
    instant: &I,
) -> Option<&'a T> {
    // quick win: appends at the end of the timeline are the common case
    let (_, last) = map.last_key_value()?;
    if last.period().contains_instant(instant) {
        return Some(last);
    }
    map.range(..=instant)
        .next_back()
        .map(|(_, t)| t)
        .filter(|t| t.period().contains_instant(instant))
}

pub(crate) fn tree_ending_at<'a, I: Instant, T: HasPeriod<I>>(
    map: &'a BTreeMap<I, T>,
    instant: &I,
) -> Option<&'a T> {
    map.range(..instant)
        .next_back()
        .map(|(_, t)| t)
        .filter(|t| t.period().end() == instant)
}

pub(crate) fn tree_overlapping<'a, I: Instant, T: HasPeriod<I>>(
    map: &'a BTreeMap<I, T>,
    range: &Period<I>,
) -> btree_map::Range<'a, I, T> {
    let lower = tree_containing(map, range.start())
        .map(|t| t.period().start().clone())
        .unwrap_or_else(|| range.start().clone());
    map.range((Bound::Included(lower), Bound::Excluded(range.end().clone())))
}

/// Keys of the entries overlapping `range`, ready for removal.
pub(crate) fn tree_overlapping_keys<I: Instant, T: HasPeriod<I>>(
    map: &BTreeMap<I, T>,
    range: &Period<I>,
) -> Vec<I> {
    tree_overlapping(map, range).map(|(k, _)| k.clone()).collect()
}

// ─── Sorted slices ──────────────────────────────────────────────────

pub(crate) fn slice_containing<I: Instant, T: HasPeriod<I>>(items: &[T], instant: &I) -> Option<usize> {
    let idx = items.partition_point(|t| t.period().start() <= instant);
    let candidate = idx.checked_sub(1)?;
    items[candidate]
        .period()
        .contains_instant(instant)
        .then_some(candidate)
}

pub(crate) fn slice_ending_at<I: Instant, T: HasPeriod<I>>(items: &[T], instant: &I) -> Option<usize> {
    let idx = items.partition_point(|t| t.period().start() < instant);
    let candidate = idx.checked_sub(1)?;
    (items[candidate].period().end() == instant).then_some(candidate)
}

/// `Ok(index)` of the item starting at `instant`, or `Err(insertion point)`.
pub(crate) fn slice_search_start<I: Instant, T: HasPeriod<I>>(
    items: &[T],
    instant: &I,
) -> Result<usize, usize> {
    items.binary_search_by(|t| t.period().start().cmp(instant))
}

pub(crate) fn slice_overlapping<I: Instant, T: HasPeriod<I>>(
    items: &[T],
    range: &Period<I>,
) -> std::ops::Range<usize> {
    let lo = slice_containing(items, range.start())
        .unwrap_or_else(|| items.partition_point(|t| t.period().start() < range.start()));
    let hi = items.partition_point(|t| t.period().start() < range.end());
    lo..hi.max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronos_core::Tick;

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    fn slice() -> Vec<Period<Tick>> {
        vec![p(1, 3), p(3, 4), p(6, 9)]
    }

    #[test]
    fn test_slice_containing() {
        let items = slice();
        assert_eq!(slice_containing(&items, &Tick::At(0)), None);
        assert_eq!(slice_containing(&items, &Tick::At(1)), Some(0));
        assert_eq!(slice_containing(&items, &Tick::At(3)), Some(1));
        assert_eq!(slice_containing(&items, &Tick::At(5)), None);
        assert_eq!(slice_containing(&items, &Tick::At(8)), Some(2));
        assert_eq!(slice_containing(&items, &Tick::At(9)), None);
    }

    #[test]
    fn test_slice_overlapping() {
        let items = slice();
        assert_eq!(slice_overlapping(&items, &p(2, 7)), 0..3);
        assert_eq!(slice_overlapping(&items, &p(4, 6)), 2..2);
        assert_eq!(slice_overlapping(&items, &p(3, 4)), 1..2);
        assert_eq!(slice_overlapping(&items, &p(-5, 1)), 0..0);
    }

    #[test]
    fn test_slice_ending_at() {
        let items = slice();
        assert_eq!(slice_ending_at(&items, &Tick::At(3)), Some(0));
        assert_eq!(slice_ending_at(&items, &Tick::At(4)), Some(1));
        assert_eq!(slice_ending_at(&items, &Tick::At(6)), None);
    }

    #[test]
    fn test_tree_lookups_agree_with_slices() {
        let map: BTreeMap<Tick, Period<Tick>> =
            slice().into_iter().map(|p| (p.start().clone(), p)).collect();
        assert_eq!(tree_containing(&map, &Tick::At(2)), Some(&p(1, 3)));
        assert_eq!(tree_containing(&map, &Tick::At(5)), None);
        assert_eq!(tree_ending_at(&map, &Tick::At(9)), Some(&p(6, 9)));
        let keys = tree_overlapping_keys(&map, &p(2, 7));
        assert_eq!(keys, vec![Tick::At(1), Tick::At(3), Tick::At(6)]);
        assert!(tree_overlapping_keys(&map, &p(4, 6)).is_empty());
    }
}
