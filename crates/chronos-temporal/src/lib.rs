//! # chronos-temporal
//!
//! The engines behind time-varying associations. [`TemporalAttribute`]
//! holds one value at a time, [`TemporalSet`] holds any number. Both turn
//! arbitrary period writes into the exact-key puts and removals their
//! storage understands, keeping entries non-overlapping and merged.

pub mod attribute;
pub mod set;
pub mod views;

pub use attribute::{SubMap, TemporalAttribute};
pub use set::TemporalSet;
pub use views::{EntrySet, PeriodSet, SetEntrySet, ValuePeriodSet, ValueSet, ValueSetAt};
