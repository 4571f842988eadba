//! # chronos-cache
//!
//! Caching layer of the chronos workspace.
//! A slab-backed LRU map, an instant interner on top of it, a read-through
//! point cache implementing `ITimeSeries`, and a lazily populated
//! attribute storage implementing `IAttributeStorage`.

pub mod handler;
pub mod interner;
pub mod lazy;
pub mod lru;
pub mod point;

pub use handler::NoChangeHandler;
pub use interner::InstantInterner;
pub use lazy::{LazyAttributeStorage, LazyFill, MissingRangeHandler, RangeChangeHandler};
pub use lru::LruCache;
pub use point::{MissingElementHandler, PointCache, PointChangeHandler, PointFill};
