//! `TimedObjectFactory` trait: create/destroy hooks for externally mapped rows.

use crate::errors::ChronosResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::timed_object::TimedObject;

/// Builds and disposes of the persisted objects behind a mapped storage.
///
/// `create` may persist a row and hand back the object the mapping layer
/// tracks; `destroy` is called once that object leaves the collection.
pub trait TimedObjectFactory<I: Instant, V> {
    fn create(&mut self, period: Period<I>, value: V) -> ChronosResult<TimedObject<I, V>>;

    fn destroy(&mut self, object: TimedObject<I, V>) -> ChronosResult<()>;
}
