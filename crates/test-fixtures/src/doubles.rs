//! Test doubles for the storage seams.

use chronos_core::errors::ChronosResult;
use chronos_core::traits::TimedObjectFactory;
use chronos_core::{Period, Tick, TimedObject};
use chronos_storage::{StorageProxy, TreeAttributeStorage};

/// Tree storage that counts the writes the engine sends it.
pub type CountingStorage<V> = StorageProxy<TreeAttributeStorage<Tick, V>>;

pub fn counting<V: Clone + PartialEq>() -> CountingStorage<V> {
    StorageProxy::new(TreeAttributeStorage::new())
}

/// Factory for mapped storages that remembers every row it created and
/// destroyed, in order.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    pub created: Vec<Period<Tick>>,
    pub destroyed: Vec<Period<Tick>>,
}

impl RecordingFactory {
    /// Rows created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.created.len().saturating_sub(self.destroyed.len())
    }
}

impl<V> TimedObjectFactory<Tick, V> for RecordingFactory {
    fn create(&mut self, period: Period<Tick>, value: V) -> ChronosResult<TimedObject<Tick, V>> {
        self.created.push(period.clone());
        Ok(TimedObject::new(period, value))
    }

    fn destroy(&mut self, object: TimedObject<Tick, V>) -> ChronosResult<()> {
        self.destroyed.push(object.period().clone());
        Ok(())
    }
}
