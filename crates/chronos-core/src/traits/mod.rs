pub mod attribute_storage;
pub mod period_storage;
pub mod set_storage;
pub mod temporal_attribute;
pub mod temporal_set;
pub mod time_series;
pub mod timed_object_factory;

pub use attribute_storage::IAttributeStorage;
pub use period_storage::IPeriodStorage;
pub use set_storage::ISetStorage;
pub use temporal_attribute::ITemporalAttribute;
pub use temporal_set::ITemporalSet;
pub use time_series::ITimeSeries;
pub use timed_object_factory::TimedObjectFactory;
