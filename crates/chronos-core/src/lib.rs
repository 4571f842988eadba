//! # chronos-core
//!
//! Foundation of the chronos workspace: the instant/period algebra,
//! timed objects, closeable cursors, the storage and engine contracts,
//! errors, configuration and tracing setup.

pub mod config;
pub mod cursor;
pub mod errors;
pub mod instant;
pub mod observability;
pub mod period;
pub mod timed_object;
pub mod traits;

pub use config::ChronosConfig;
pub use cursor::{BoxCursor, Cursor};
pub use errors::{ChronosError, ChronosResult};
pub use instant::{Instant, Moment, Tick, Timestamp};
pub use period::{Intersection, Period};
pub use timed_object::TimedObject;
