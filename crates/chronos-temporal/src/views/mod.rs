//! Live collection views over attributes and sets.
//!
//! Views borrow their owner and delegate every call to it. They support
//! reads, removal and clearing, all written through the owner's engine;
//! insertion is refused because a view element alone does not say what to
//! associate over which period.

mod attribute;
mod set;

pub use attribute::{EntrySet, PeriodSet};
pub use set::{SetEntrySet, ValuePeriodSet, ValueSet, ValueSetAt};

use chronos_core::errors::{ChronosError, TemporalError};

pub(crate) fn refuse_insert(view: &str) -> ChronosError {
    TemporalError::Unsupported(format!("cannot add through a {view}")).into()
}
