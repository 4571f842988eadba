//! Property tests for the interval algebra.

use proptest::prelude::*;

use chronos_core::{Period, Tick};

fn arb_period() -> impl Strategy<Value = Period<Tick>> {
    (-50i64..50, 1i64..30).prop_map(|(start, len)| {
        Period::new(Tick::At(start), Tick::At(start + len)).unwrap()
    })
}

fn covered(period: &Period<Tick>, i: i64) -> bool {
    period.contains_instant(&Tick::At(i))
}

// ═══════════════════════════════════════════════════════════════════════════
// Algebra laws
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_intersect_is_common_part(a in arb_period(), b in arb_period()) {
        match a.intersect(&b) {
            None => prop_assert!(!a.overlaps(&b)),
            Some(i) => {
                let i = i.into_period();
                prop_assert!(a.contains(&i));
                prop_assert!(b.contains(&i));
                for t in -60..90 {
                    prop_assert_eq!(covered(&i, t), covered(&a, t) && covered(&b, t));
                }
            }
        }
    }

    #[test]
    fn prop_except_removes_argument(a in arb_period(), b in arb_period()) {
        match a.except(&b) {
            Err(_) => prop_assert!(a.start() < b.start() && a.end() > b.end()),
            Ok(None) => prop_assert!(b.contains(&a)),
            Ok(Some(rest)) => {
                for t in -60..90 {
                    prop_assert_eq!(covered(&rest, t), covered(&a, t) && !covered(&b, t));
                }
            }
        }
    }

    #[test]
    fn prop_remainders_partition_the_receiver(a in arb_period(), b in arb_period()) {
        prop_assume!(a.overlaps(&b));
        let head = a.preceding_period(&b);
        let tail = a.succeeding_period(&b);
        for t in -60..90 {
            let in_head = head.as_ref().is_some_and(|h| covered(h, t));
            let in_tail = tail.as_ref().is_some_and(|h| covered(h, t));
            let in_a_outside_b = covered(&a, t) && !covered(&b, t);
            prop_assert_eq!(in_head || in_tail, in_a_outside_b);
            prop_assert!(!(in_head && in_tail));
        }
    }

    #[test]
    fn prop_union_of_meeting_periods(a in arb_period(), len in 1i64..20) {
        let next = Period::new(a.end().clone(), Tick::At(a.end().value().copied().unwrap_or(0) + len)).unwrap();
        let joined = a.union(&next).unwrap();
        prop_assert_eq!(joined.start(), a.start());
        prop_assert_eq!(joined.end(), next.end());
    }
}
