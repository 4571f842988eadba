//! # test-fixtures
//!
//! Shared test support for the chronos workspace: terse constructors for
//! tick periods, counting and recording doubles for the storage seams,
//! in-memory sources behind the caches, and proptest strategies.

pub mod doubles;
pub mod helpers;
pub mod sources;
pub mod strategies;

pub use doubles::{counting, CountingStorage, RecordingFactory};
pub use helpers::{always, from, p, t, until};
pub use sources::{PointSource, RangeSource};
