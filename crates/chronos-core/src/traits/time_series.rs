//! `ITimeSeries` trait: a point mapping from instants to values.

use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;

/// An instant → value mapping, not interval based.
///
/// Reads take `&mut self` because implementations are typically caches
/// that reorder or fill themselves on access.
pub trait ITimeSeries<I: Instant, V> {
    fn get(&mut self, instant: &I) -> ChronosResult<Option<V>>;

    /// Store `value` at `instant`; returns the previous value.
    fn put(&mut self, instant: I, value: V) -> ChronosResult<Option<V>>;

    /// Remove the value at `instant`; returns it.
    fn remove(&mut self, instant: &I) -> ChronosResult<Option<V>>;

    /// Remove every value within `period`.
    fn remove_period(&mut self, period: &Period<I>) -> ChronosResult<()>;

    fn contains_instant(&mut self, instant: &I) -> ChronosResult<bool> {
        Ok(self.get(instant)?.is_some())
    }
}
