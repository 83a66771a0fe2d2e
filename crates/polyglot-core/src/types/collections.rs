//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec for imported names (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec for short lists such as method names on small classes.
pub type SmallVec8<T> = SmallVec<[T; 8]>;
