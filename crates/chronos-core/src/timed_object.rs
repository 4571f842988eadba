//! A value paired with the period during which it holds.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instant::Instant;
use crate::period::{Intersection, Period};

/// Immutable `(period, value)` pair. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(
    serialize = "I: Instant + Serialize, V: Serialize",
    deserialize = "I: Instant + Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct TimedObject<I, V> {
    period: Period<I>,
    value: V,
}

impl<I: Instant, V> TimedObject<I, V> {
    pub fn new(period: Period<I>, value: V) -> Self {
        Self { period, value }
    }

    pub fn period(&self) -> &Period<I> {
        &self.period
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (Period<I>, V) {
        (self.period, self.value)
    }

    /// Clip this object to `range`, keeping its value.
    ///
    /// Returns the object itself, borrowed, when it already lies inside
    /// `range`, and `None` when the two do not overlap.
    pub fn intersect(&self, range: &Period<I>) -> Option<Cow<'_, Self>>
    where
        V: Clone,
    {
        match self.period.intersect(range)? {
            Intersection::Receiver(_) => Some(Cow::Borrowed(self)),
            clipped => Some(Cow::Owned(Self {
                period: clipped.into_period(),
                value: self.value.clone(),
            })),
        }
    }
}

impl<I: fmt::Debug, V: fmt::Debug> fmt::Display for TimedObject<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.period, self.value)
    }
}
