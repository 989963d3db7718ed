//! Shared data structures for prep.

pub mod collections;

pub use collections::{FxHashMap, FxHashSet, SmallVec2};
