//! Period-only collections, one per value inside a set storage.

mod compact;
mod tree;

pub use compact::CompactPeriodStorage;
pub use tree::TreePeriodStorage;
