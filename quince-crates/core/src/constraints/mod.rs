//! Defines the constraints that Quince provides out of the box, which can be added to a
//! [`State`].
//!
//! A constraint is a relation over variables. It is enforced through propagators, and can
//! therefore be viewed as a collection of propagators.
//!
//! # Example
//! ```
//! # use quince_core::constraints;
//! # use quince_core::constraints::Constraint;
//! # use quince_core::State;
//! let mut state = State::default();
//!
//! let x = [0, 0].map(|_| state.new_interval_variable(0, 3, None).unwrap());
//! let y = [0, 0].map(|_| state.new_interval_variable(0, 0, None).unwrap());
//! let extent = state.new_interval_variable(2, 2, None).unwrap();
//!
//! constraints::non_overlap(x, y, [extent; 2], [extent; 2])
//!     .post(&mut state)
//!     .expect("the arrays have equal lengths and fixed extents");
//!
//! assert!(state.propagate_to_fixed_point().is_ok());
//! ```
mod non_overlap;
mod set_member;

pub use non_overlap::*;
pub use set_member::*;

use crate::basic_types::ConfigurationError;
use crate::propagation::PropagatorConstructor;
use crate::State;

/// A [`Constraint`] is a relation over variables. It disqualifies certain assignments from
/// making it into a solution.
pub trait Constraint {
    /// Add the [`Constraint`] to the [`State`].
    ///
    /// Constraints can only be posted at checkpoint 0. An error is returned if the arguments do
    /// not describe a valid constraint; no propagation happens yet.
    fn post(self, state: &mut State) -> Result<(), ConfigurationError>;
}

impl<ConcretePropagator> Constraint for ConcretePropagator
where
    ConcretePropagator: PropagatorConstructor + 'static,
{
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        let _ = state.add_propagator(self);
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        self.into_iter().try_for_each(|c| c.post(state))
    }
}
