//! Short constructors over `Tick`, so tests read like timelines.

use chronos_core::{Period, Tick};

pub fn t(n: i64) -> Tick {
    Tick::At(n)
}

/// `[a, b)`. Panics unless `a < b`.
pub fn p(a: i64, b: i64) -> Period<Tick> {
    Period::new(t(a), t(b)).expect("fixture period must be non-empty")
}

/// `[a, +inf)`.
pub fn from(a: i64) -> Period<Tick> {
    Period::starting_at(t(a)).expect("finite start")
}

/// `[-inf, b)`.
pub fn until(b: i64) -> Period<Tick> {
    Period::until(t(b)).expect("finite end")
}

pub fn always() -> Period<Tick> {
    Period::always()
}
