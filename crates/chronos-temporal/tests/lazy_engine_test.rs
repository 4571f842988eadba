//! The attribute engine running over a lazily populated cache.

use chronos_cache::{LazyAttributeStorage, NoChangeHandler};
use chronos_core::traits::ITemporalAttribute;
use chronos_core::Tick;
use chronos_temporal::TemporalAttribute;
use test_fixtures::{from, p, t, until, RangeSource};

type Cached = TemporalAttribute<Tick, char, LazyAttributeStorage<Tick, char, RangeSource<char>, RangeSource<char>>>;
type ReadOnly = TemporalAttribute<Tick, char, LazyAttributeStorage<Tick, char, RangeSource<char>, NoChangeHandler>>;

fn source() -> RangeSource<char> {
    RangeSource::new([(p(0, 10), 'a'), (p(10, 20), 'b'), (p(30, 40), 'c')]).unwrap()
}

fn cached(source: &RangeSource<char>) -> Cached {
    TemporalAttribute::new(LazyAttributeStorage::new(source.clone(), source.clone()))
}

#[test]
fn test_reads_load_only_what_they_need() {
    let src = source();
    let attr = cached(&src);

    assert_eq!(attr.get(&t(35)).unwrap(), Some('c'));
    assert_eq!(src.ranges(), vec![from(35)]);
    assert_eq!(attr.storage().caching_limit(), Some(t(30)));

    assert_eq!(attr.get(&t(5)).unwrap(), Some('a'));
    assert_eq!(src.ranges(), vec![from(35), p(5, 30)]);
}

#[test]
fn test_first_instant_loads_everything() {
    let src = source();
    let attr = cached(&src);
    attr.get(&t(35)).unwrap();

    assert_eq!(attr.first_instant().unwrap(), t(0));
    assert_eq!(src.ranges().last(), Some(&until(30)));
    assert_eq!(attr.storage().caching_limit(), Some(Tick::NegativeInfinity));
    assert_eq!(attr.len().unwrap(), 3);
}

#[test]
fn test_writes_reach_the_backing_store() {
    let src = source();
    let mut attr = cached(&src);
    attr.get(&t(35)).unwrap();

    assert!(attr.put(p(12, 15), 'z').unwrap());
    assert_eq!(attr.get(&t(11)).unwrap(), Some('b'));
    assert_eq!(attr.get(&t(13)).unwrap(), Some('z'));
    assert_eq!(
        src.stored(),
        vec![
            (p(0, 10), 'a'),
            (p(10, 12), 'b'),
            (p(12, 15), 'z'),
            (p(15, 20), 'b'),
            (p(30, 40), 'c'),
        ]
    );
}

#[test]
fn test_merge_across_the_caching_limit() {
    let src = RangeSource::new([(p(0, 10), 'a'), (p(10, 20), 'b')]).unwrap();
    let mut attr = cached(&src);

    attr.get(&t(10)).unwrap();
    assert_eq!(attr.storage().caching_limit(), Some(t(10)));

    attr.put(p(10, 20), 'a').unwrap();
    assert_eq!(src.ending_lookups(), 1);
    assert_eq!(src.stored(), vec![(p(0, 20), 'a')]);
}

#[test]
fn test_clear_marks_whole_timeline_known() {
    let src = source();
    let mut attr = cached(&src);
    attr.clear().unwrap();

    assert!(src.stored().is_empty());
    assert!(attr.is_empty().unwrap());
    assert!(src.ranges().is_empty());
}

#[test]
fn test_read_only_cache_refuses_writes() {
    let src = source();
    let mut attr: ReadOnly = TemporalAttribute::new(LazyAttributeStorage::read_only(src.clone()));
    assert_eq!(attr.get(&t(15)).unwrap(), Some('b'));

    let err = attr.put(p(50, 60), 'q').unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(src.writes(), 0);
}
