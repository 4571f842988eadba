//! Proptest strategies over small tick timelines.
//!
//! Bounds and value domains are kept small on purpose: collisions between
//! generated periods and equal neighbouring values are what exercise the
//! merge and split paths.

use chronos_core::{Period, Tick};
use proptest::prelude::*;

use crate::helpers::{from, p, t, until};

/// Finite periods within `[0, span)`.
pub fn finite_period(span: i64) -> impl Strategy<Value = Period<Tick>> {
    (0..span - 1)
        .prop_flat_map(move |start| (Just(start), start + 1..span))
        .prop_map(|(start, end)| p(start, end))
}

/// Periods within `[0, span)`, with either bound occasionally infinite.
pub fn any_period(span: i64) -> impl Strategy<Value = Period<Tick>> {
    prop_oneof![
        6 => finite_period(span),
        1 => (0..span).prop_map(from),
        1 => (1..span).prop_map(until),
    ]
}

/// An instant within `[0, span)` or one of the infinities.
pub fn any_instant(span: i64) -> impl Strategy<Value = Tick> {
    prop_oneof![
        8 => (0..span).prop_map(t),
        1 => Just(Tick::NegativeInfinity),
        1 => Just(Tick::PositiveInfinity),
    ]
}

/// One write against an attribute: `Some(v)` puts `v`, `None` removes.
pub fn write_op(span: i64, values: u8) -> impl Strategy<Value = (Period<Tick>, Option<u8>)> {
    (
        any_period(span),
        prop_oneof![4 => (0..values).prop_map(Some), 1 => Just(None)],
    )
}

pub fn write_ops(span: i64, values: u8, max_len: usize) -> impl Strategy<Value = Vec<(Period<Tick>, Option<u8>)>> {
    prop::collection::vec(write_op(span, values), 0..max_len)
}
