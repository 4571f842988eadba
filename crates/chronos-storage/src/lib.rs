//! # chronos-storage
//!
//! In-memory backends for temporal attributes and sets.
//! Implements `IAttributeStorage`, `ISetStorage` and `IPeriodStorage`:
//! a `BTreeMap` tree, a sorted-array compact form, a mapped adapter over
//! externally persisted rows, and a counting proxy.

mod sorted;

pub mod compact;
pub mod mapped;
pub mod periods;
pub mod proxy;
pub mod set;
pub mod tree;

pub use compact::CompactAttributeStorage;
pub use mapped::MappedAttributeStorage;
pub use periods::{CompactPeriodStorage, TreePeriodStorage};
pub use proxy::{StorageProxy, StorageStats};
pub use set::{CompactSetStorage, IndexedSetStorage, TreeSetStorage};
pub use tree::TreeAttributeStorage;
