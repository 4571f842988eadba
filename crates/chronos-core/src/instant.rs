//! Totally ordered points in time with distinguished infinities.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable, totally ordered point in time.
///
/// Implementations must keep `Ord` and `Eq` consistent (`cmp == Equal`
/// exactly when `==`), and must order the two sentinels returned by
/// [`Instant::negative_infinity`] and [`Instant::positive_infinity`]
/// below and above every other value respectively.
pub trait Instant: Ord + Clone + Hash + fmt::Debug {
    fn negative_infinity() -> Self;
    fn positive_infinity() -> Self;
    fn is_negative_infinity(&self) -> bool;
    fn is_positive_infinity(&self) -> bool;

    fn is_finite(&self) -> bool {
        !self.is_negative_infinity() && !self.is_positive_infinity()
    }
}

/// A point on a timeline of `T`, extended with both infinities.
///
/// Variant order drives the derived `Ord`, so the sentinels always sit at
/// the extremes whatever `T` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Moment<T> {
    NegativeInfinity,
    At(T),
    PositiveInfinity,
}

impl<T> Moment<T> {
    /// The finite value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Moment::At(t) => Some(t),
            _ => None,
        }
    }
}

impl<T> From<T> for Moment<T> {
    fn from(value: T) -> Self {
        Moment::At(value)
    }
}

impl<T: Ord + Clone + Hash + fmt::Debug> Instant for Moment<T> {
    fn negative_infinity() -> Self {
        Moment::NegativeInfinity
    }

    fn positive_infinity() -> Self {
        Moment::PositiveInfinity
    }

    fn is_negative_infinity(&self) -> bool {
        matches!(self, Moment::NegativeInfinity)
    }

    fn is_positive_infinity(&self) -> bool {
        matches!(self, Moment::PositiveInfinity)
    }
}

impl<T: fmt::Display> fmt::Display for Moment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moment::NegativeInfinity => f.write_str("-inf"),
            Moment::At(t) => t.fmt(f),
            Moment::PositiveInfinity => f.write_str("+inf"),
        }
    }
}

/// Integer ticks, handy for tests and logical clocks.
pub type Tick = Moment<i64>;

/// Wall-clock instants.
pub type Timestamp = Moment<DateTime<Utc>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_bound_every_value() {
        let values = [Tick::At(i64::MIN), Tick::At(0), Tick::At(i64::MAX)];
        for v in values {
            assert!(Tick::negative_infinity() < v);
            assert!(v < Tick::positive_infinity());
        }
        assert!(Tick::negative_infinity() < Tick::positive_infinity());
    }

    #[test]
    fn test_infinity_predicates() {
        assert!(Tick::PositiveInfinity.is_positive_infinity());
        assert!(!Tick::PositiveInfinity.is_negative_infinity());
        assert!(Tick::NegativeInfinity.is_negative_infinity());
        assert!(Tick::At(3).is_finite());
        assert!(!Tick::PositiveInfinity.is_finite());
    }

    #[test]
    fn test_timestamp_ordering_follows_chrono() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(1);
        assert!(Timestamp::At(earlier) < Timestamp::At(later));
        assert_eq!(Timestamp::At(earlier), Timestamp::from(earlier));
    }
}
