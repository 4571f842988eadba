//! `IPeriodStorage` trait: a sorted collection of non-overlapping periods.
//!
//! Set storages keep one of these per value.

use crate::cursor::BoxCursor;
use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;

pub trait IPeriodStorage<I: Instant> {
    fn first_period(&self) -> Option<Period<I>>;
    fn last_period(&self) -> Option<Period<I>>;

    /// The period containing `instant`.
    fn get_period(&self, instant: &I) -> Option<Period<I>>;
    fn get_period_ending_at(&self, instant: &I) -> Option<Period<I>>;
    fn get_period_starting_at(&self, instant: &I) -> Option<Period<I>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no stored period overlaps `range`.
    fn is_empty_in(&self, range: &Period<I>) -> bool;

    fn period_cursor(&self) -> BoxCursor<'_, Period<I>>;

    /// Periods overlapping `range`, sorted by start.
    fn period_cursor_in(&self, range: &Period<I>) -> BoxCursor<'_, Period<I>>;

    /// Fails if a period with the same start is already stored.
    fn put(&mut self, period: Period<I>) -> ChronosResult<()>;

    /// Remove exactly `period`. Fails if absent.
    fn remove(&mut self, period: &Period<I>) -> ChronosResult<()>;

    /// Remove every period overlapping `range`; returns how many went.
    fn remove_range(&mut self, range: &Period<I>) -> usize;

    fn clear(&mut self);
}
