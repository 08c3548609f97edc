//! Reversible state.
//!
//! Every piece of memory which must be restored on backtracking, whether it describes a domain or
//! the private state of a propagator, is stored as a [`TrailedInteger`] inside one
//! [`TrailedValues`]. Backtracking therefore consists of a single call to
//! [`TrailedValues::synchronise`].
mod trailed_bitset;
mod trailed_change;
mod trailed_integer;
mod trailed_values;

pub(crate) use trailed_bitset::TrailedBitSet;
pub(crate) use trailed_change::TrailedChange;
pub use trailed_integer::TrailedInteger;
pub(crate) use trailed_values::TrailedValues;
