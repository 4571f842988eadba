//! Half-open periods `[start, end)` and the interval algebra over them.
//!
//! A period whose end is positive infinity also contains positive infinity
//! itself, as if the upper bound did not exist.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ChronosResult, TemporalError};
use crate::instant::Instant;

/// Immutable half-open interval. `start < end` always holds.
///
/// Equality and ordering are lexicographic on `(start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodRepr<I>", into = "PeriodRepr<I>")]
#[serde(bound(
    serialize = "I: Instant + Serialize",
    deserialize = "I: Instant + Deserialize<'de>"
))]
pub struct Period<I> {
    start: I,
    end: I,
}

#[derive(Serialize, Deserialize)]
struct PeriodRepr<I> {
    start: I,
    end: I,
}

impl<I: Instant> TryFrom<PeriodRepr<I>> for Period<I> {
    type Error = String;

    fn try_from(repr: PeriodRepr<I>) -> Result<Self, Self::Error> {
        Period::new(repr.start, repr.end).map_err(|e| e.to_string())
    }
}

impl<I> From<Period<I>> for PeriodRepr<I> {
    fn from(p: Period<I>) -> Self {
        PeriodRepr { start: p.start, end: p.end }
    }
}

/// Result of [`Period::intersect`] on overlapping periods.
///
/// When one operand wholly contains the other, the contained operand is
/// handed back untouched so callers can detect a no-op cheaply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intersection<'a, I> {
    /// The receiver lies inside the argument.
    Receiver(&'a Period<I>),
    /// The argument lies inside the receiver.
    Argument(&'a Period<I>),
    /// A freshly built overlap of two partially overlapping periods.
    Partial(Period<I>),
}

impl<I: Clone> Intersection<'_, I> {
    pub fn is_unchanged(&self) -> bool {
        !matches!(self, Intersection::Partial(_))
    }

    pub fn as_period(&self) -> &Period<I> {
        match self {
            Intersection::Receiver(p) | Intersection::Argument(p) => p,
            Intersection::Partial(p) => p,
        }
    }

    pub fn into_period(self) -> Period<I> {
        match self {
            Intersection::Receiver(p) | Intersection::Argument(p) => p.clone(),
            Intersection::Partial(p) => p,
        }
    }
}

impl<I: Instant> Period<I> {
    /// Build `[start, end)`. Fails unless `start < end`.
    pub fn new(start: I, end: I) -> ChronosResult<Self> {
        if start >= end {
            return Err(TemporalError::InvalidPeriod {
                start: format!("{start:?}"),
                end: format!("{end:?}"),
            }
            .into());
        }
        Ok(Self { start, end })
    }

    /// `[-inf, +inf)`, the whole timeline.
    pub fn always() -> Self {
        Self {
            start: I::negative_infinity(),
            end: I::positive_infinity(),
        }
    }

    /// `[start, +inf)`. Fails when `start` is positive infinity.
    pub fn starting_at(start: I) -> ChronosResult<Self> {
        Self::new(start, I::positive_infinity())
    }

    /// `[-inf, end)`. Fails when `end` is negative infinity.
    pub fn until(end: I) -> ChronosResult<Self> {
        Self::new(I::negative_infinity(), end)
    }

    pub fn start(&self) -> &I {
        &self.start
    }

    pub fn end(&self) -> &I {
        &self.end
    }

    pub fn into_bounds(self) -> (I, I) {
        (self.start, self.end)
    }

    /// True when this period ends no later than `p` starts.
    pub fn precedes(&self, p: &Period<I>) -> bool {
        self.end <= p.start
    }

    pub fn precedes_instant(&self, i: &I) -> bool {
        self.end <= *i
    }

    /// True when this period starts no earlier than `p` ends.
    pub fn succeeds(&self, p: &Period<I>) -> bool {
        self.start >= p.end
    }

    pub fn succeeds_instant(&self, i: &I) -> bool {
        self.start > *i
    }

    /// True when the two periods share exactly one boundary.
    pub fn meets(&self, p: &Period<I>) -> bool {
        self.meets_before(p) || self.meets_after(p)
    }

    pub fn meets_before(&self, p: &Period<I>) -> bool {
        self.end == p.start
    }

    pub fn meets_after(&self, p: &Period<I>) -> bool {
        self.start == p.end
    }

    pub fn contains(&self, p: &Period<I>) -> bool {
        self.start <= p.start && p.end <= self.end
    }

    pub fn contains_instant(&self, i: &I) -> bool {
        if self.start > *i {
            return false;
        }
        if self.end.is_positive_infinity() {
            return true;
        }
        *i < self.end
    }

    pub fn overlaps(&self, p: &Period<I>) -> bool {
        self.start < p.end && p.start < self.end
    }

    /// Join two periods that meet. Anything else is an invalid argument.
    pub fn union(&self, p: &Period<I>) -> ChronosResult<Period<I>> {
        if self.meets_before(p) {
            return Ok(Self {
                start: self.start.clone(),
                end: p.end.clone(),
            });
        }
        if self.meets_after(p) {
            return Ok(Self {
                start: p.start.clone(),
                end: self.end.clone(),
            });
        }
        Err(TemporalError::InvalidArgument(format!(
            "{self} and {p} do not meet, union impossible"
        ))
        .into())
    }

    pub fn intersect<'a>(&'a self, p: &'a Period<I>) -> Option<Intersection<'a, I>> {
        if !self.overlaps(p) {
            return None;
        }
        if self.contains(p) {
            return Some(Intersection::Argument(p));
        }
        if p.contains(self) {
            return Some(Intersection::Receiver(self));
        }
        let start = std::cmp::max(&self.start, &p.start).clone();
        let end = std::cmp::min(&self.end, &p.end).clone();
        Some(Intersection::Partial(Self { start, end }))
    }

    /// Set difference. `None` when `p` covers this period entirely; fails
    /// when `p` lies strictly inside, which would leave two pieces.
    pub fn except(&self, p: &Period<I>) -> ChronosResult<Option<Period<I>>> {
        if p.contains(self) {
            return Ok(None);
        }
        if !self.overlaps(p) {
            return Ok(Some(self.clone()));
        }
        if self.start < p.start && self.end > p.end {
            return Err(TemporalError::InvalidArgument(format!(
                "removing {p} from {self} leaves two distinct periods"
            ))
            .into());
        }
        if self.start < p.start {
            return Ok(Some(Self {
                start: self.start.clone(),
                end: p.start.clone(),
            }));
        }
        Ok(Some(Self {
            start: p.end.clone(),
            end: self.end.clone(),
        }))
    }

    /// The part of this period strictly before `p` starts.
    pub fn preceding_period(&self, p: &Period<I>) -> Option<Period<I>> {
        if self.start >= p.start {
            return None;
        }
        if self.end <= p.start {
            return Some(self.clone());
        }
        Some(Self {
            start: self.start.clone(),
            end: p.start.clone(),
        })
    }

    /// The part of this period after `p` ends.
    pub fn succeeding_period(&self, p: &Period<I>) -> Option<Period<I>> {
        if self.end <= p.end {
            return None;
        }
        if self.start >= p.end {
            return Some(self.clone());
        }
        Some(Self {
            start: p.end.clone(),
            end: self.end.clone(),
        })
    }
}

impl<I: fmt::Debug> fmt::Display for Period<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instant::Tick;

    fn p(a: i64, b: i64) -> Period<Tick> {
        Period::new(Tick::At(a), Tick::At(b)).unwrap()
    }

    #[test]
    fn test_rejects_empty_and_reversed() {
        assert!(Period::new(Tick::At(3), Tick::At(3)).is_err());
        assert!(Period::new(Tick::At(4), Tick::At(3)).is_err());
        assert!(Period::new(Tick::PositiveInfinity, Tick::PositiveInfinity).is_err());
    }

    #[test]
    fn test_half_open_containment() {
        let period = p(1, 3);
        assert!(period.contains_instant(&Tick::At(1)));
        assert!(period.contains_instant(&Tick::At(2)));
        assert!(!period.contains_instant(&Tick::At(3)));
        assert!(!period.contains_instant(&Tick::At(0)));
    }

    #[test]
    fn test_open_end_contains_positive_infinity() {
        let period = Period::starting_at(Tick::At(5)).unwrap();
        assert!(period.contains_instant(&Tick::PositiveInfinity));
        assert!(Period::<Tick>::always().contains_instant(&Tick::PositiveInfinity));
        assert!(Period::<Tick>::always().contains_instant(&Tick::NegativeInfinity));
        assert!(!p(1, 3).contains_instant(&Tick::PositiveInfinity));
    }

    #[test]
    fn test_intersect_tags_unchanged_operand() {
        let outer = p(1, 10);
        let inner = p(3, 5);
        assert_eq!(outer.intersect(&inner), Some(Intersection::Argument(&inner)));
        assert_eq!(inner.intersect(&outer), Some(Intersection::Receiver(&inner)));
        let (left, right) = (p(1, 4), p(2, 6));
        let partial = left.intersect(&right).unwrap();
        assert!(!partial.is_unchanged());
        assert_eq!(partial.into_period(), p(2, 4));
        assert!(p(1, 2).intersect(&p(2, 3)).is_none());
    }

    #[test]
    fn test_except_variants() {
        assert_eq!(p(1, 5).except(&p(0, 6)).unwrap(), None);
        assert_eq!(p(1, 5).except(&p(3, 8)).unwrap(), Some(p(1, 3)));
        assert_eq!(p(1, 5).except(&p(0, 2)).unwrap(), Some(p(2, 5)));
        assert_eq!(p(1, 5).except(&p(7, 8)).unwrap(), Some(p(1, 5)));
        assert!(p(1, 5).except(&p(2, 3)).is_err());
    }

    #[test]
    fn test_preceding_and_succeeding() {
        let base = p(1, 10);
        assert_eq!(base.preceding_period(&p(4, 6)), Some(p(1, 4)));
        assert_eq!(base.succeeding_period(&p(4, 6)), Some(p(6, 10)));
        assert_eq!(base.preceding_period(&p(0, 6)), None);
        assert_eq!(base.succeeding_period(&p(4, 12)), None);
        assert_eq!(base.preceding_period(&p(12, 14)), Some(base.clone()));
        assert_eq!(base.succeeding_period(&p(-3, 0)), Some(base.clone()));
    }

    #[test]
    fn test_union_requires_meeting() {
        assert_eq!(p(1, 3).union(&p(3, 5)).unwrap(), p(1, 5));
        assert_eq!(p(3, 5).union(&p(1, 3)).unwrap(), p(1, 5));
        assert!(p(1, 3).union(&p(2, 5)).is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(p(1, 3) < p(1, 4));
        assert!(p(1, 9) < p(2, 3));
        assert!(p(1, 3).precedes(&p(3, 4)));
        assert!(p(3, 4).succeeds(&p(1, 3)));
        assert!(p(1, 3).meets(&p(3, 4)));
        assert!(!p(1, 3).overlaps(&p(3, 4)));
    }
}
