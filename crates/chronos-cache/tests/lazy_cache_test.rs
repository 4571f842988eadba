//! Lazy interval cache driven directly through the storage contract.

use chronos_cache::{LazyAttributeStorage, NoChangeHandler};
use chronos_core::errors::{CacheError, ChronosError};
use chronos_core::traits::IAttributeStorage;
use chronos_core::{Period, Tick};
use test_fixtures::{always, from, p, t, until, RangeSource};

type ReadThrough = LazyAttributeStorage<Tick, char, RangeSource<char>, NoChangeHandler>;
type WriteThrough = LazyAttributeStorage<Tick, char, RangeSource<char>, RangeSource<char>>;

fn source() -> RangeSource<char> {
    RangeSource::new([(p(0, 10), 'a'), (p(10, 20), 'b'), (p(30, 40), 'c')]).unwrap()
}

fn read_through(src: &RangeSource<char>) -> ReadThrough {
    LazyAttributeStorage::read_only(src.clone())
}

// ---------------------------------------------------------------------------
// Population order
// ---------------------------------------------------------------------------

#[test]
fn test_limit_moves_backwards_only() {
    let src = source();
    let cache = read_through(&src);
    assert_eq!(cache.caching_limit(), None);

    cache.get_value(&t(25)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(25)));
    cache.get_value(&t(32)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(25)));
    assert_eq!(src.ranges(), vec![from(25)]);

    cache.get_value(&t(12)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(12)));
    assert_eq!(src.ranges(), vec![from(25), p(12, 25)]);
}

#[test]
fn test_query_at_positive_infinity_loads_everything() {
    let src = source();
    let cache = read_through(&src);
    assert_eq!(cache.get_value(&Tick::PositiveInfinity).unwrap(), None);
    assert_eq!(src.ranges(), vec![always()]);
    assert_eq!(cache.caching_limit(), Some(Tick::NegativeInfinity));
}

#[test]
fn test_range_queries_load_from_their_start() {
    let src = source();
    let cache = read_through(&src);
    assert_eq!(cache.len_in(&p(15, 35)).unwrap(), 2);
    assert_eq!(src.ranges(), vec![from(15)]);
    let periods: Vec<Period<Tick>> = cache.period_cursor_in(&p(5, 12)).unwrap().collect();
    assert_eq!(periods, vec![p(0, 10), p(10, 20)]);
    assert_eq!(src.ranges().last(), Some(&p(5, 10)));
}

#[test]
fn test_entry_ending_at_limit_is_fetched_once() {
    let src = source();
    let cache = read_through(&src);
    cache.get_value(&t(20)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(20)));

    assert_eq!(cache.get_entry_ending_at(&t(20)).unwrap().map(|e| e.into_parts().1), Some('b'));
    assert_eq!(src.ending_lookups(), 1);
    cache.get_entry_ending_at(&t(20)).unwrap();
    assert_eq!(src.ending_lookups(), 1);
}

#[test]
fn test_first_period_forces_full_load() {
    let src = source();
    let cache = read_through(&src);
    assert_eq!(cache.first_period().unwrap(), p(0, 10));
    assert_eq!(src.ranges(), vec![always()]);
    assert_eq!(cache.len().unwrap(), 3);
    assert_eq!(src.ranges().len(), 1);
}

// ---------------------------------------------------------------------------
// Manual population
// ---------------------------------------------------------------------------

#[test]
fn test_manual_population_contract() {
    let mut cache = read_through(&source());
    let err = cache.populated(&p(0, 10)).unwrap_err();
    assert!(matches!(err, ChronosError::CacheError(CacheError::NotPopulated(_))));

    cache.put_in_cache(from(50), 'z').unwrap();
    cache.populated(&from(50)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(50)));

    let err = cache.populated(&p(10, 40)).unwrap_err();
    assert!(matches!(err, ChronosError::CacheError(CacheError::PopulationGap { .. })));

    cache.populated(&p(40, 50)).unwrap();
    assert_eq!(cache.caching_limit(), Some(t(40)));
}

#[test]
fn test_clear_cache_forgets_loaded_ranges() {
    let src = source();
    let mut cache = read_through(&src);
    cache.get_value(&t(5)).unwrap();
    cache.clear_cache();
    assert_eq!(cache.caching_limit(), None);
    cache.get_value(&t(5)).unwrap();
    assert_eq!(src.ranges().len(), 2);
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[test]
fn test_writes_go_through_the_writer() {
    let src = source();
    let mut cache: WriteThrough = LazyAttributeStorage::new(src.clone(), src.clone());
    cache.put(p(20, 30), 'n').unwrap();
    cache.remove_entry(&p(30, 40)).unwrap();
    assert_eq!(cache.remove_range(&until(10)).unwrap(), 1);

    assert_eq!(src.stored(), vec![(p(10, 20), 'b'), (p(20, 30), 'n')]);
    assert_eq!(cache.len().unwrap(), 2);
}

#[test]
fn test_read_only_refuses_clear() {
    let mut cache = read_through(&source());
    assert!(cache.clear().unwrap_err().is_unsupported());
}
