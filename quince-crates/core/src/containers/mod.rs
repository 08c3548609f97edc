//! Containers which are indexed by strongly typed keys rather than raw `usize`s.
mod keyed_vec;

pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;
