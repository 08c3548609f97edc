//! # Quince
//! Quince is the propagation engine of a finite-domain constraint solver. It keeps integer and
//! set variables whose domains live in reversible storage, and runs propagators until none of
//! them can remove another value.
//!
//! The engine is driven through a [`State`]:
//! - variables are created with [`State::new_interval_variable`] and
//!   [`State::new_set_variable`];
//! - constraints from [`constraints`] are posted on it, or propagators are added directly with
//!   [`State::add_propagator`];
//! - decisions change the domains, after which [`State::propagate_to_fixed_point`] runs the
//!   propagators;
//! - [`State::new_checkpoint`] and [`State::restore_to`] undo decisions and their consequences.
//!
//! # Example
//! ```
//! # use quince_core::constraints;
//! # use quince_core::constraints::Constraint;
//! # use quince_core::State;
//! let mut state = State::default();
//!
//! // Two 2x2 squares on a 3x2 board.
//! let x = [0, 0].map(|_| state.new_interval_variable(0, 1, None).unwrap());
//! let y = [0, 0].map(|_| state.new_interval_variable(0, 0, None).unwrap());
//! let two = state.new_interval_variable(2, 2, None).unwrap();
//!
//! constraints::non_overlap(x, y, [two; 2], [two; 2])
//!     .post(&mut state)
//!     .expect("valid arguments");
//!
//! // There is no room for both squares.
//! assert!(state.propagate_to_fixed_point().is_err());
//! ```
//!
//! Propagators are scheduled through two priority queues: a fine one, in which each changed
//! variable is dispatched to the propagators watching it, and a coarse one, in which propagators
//! are enqueued with the union of the events since their last call. See [`options`] for how the
//! queues are configured, and [`propagation`] for how to write a propagator.
pub mod asserts;
pub(crate) mod basic_types;
pub mod constraints;
pub mod containers;
pub(crate) mod engine;
pub mod options;
pub mod propagation;
pub mod propagators;
pub mod statistics;
pub mod termination;

pub mod variables {
    //! The identifiers of the variables held by a [`crate::State`].
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::SetDomainId;
    pub use crate::engine::variables::VariableId;
}

pub use convert_case;
pub use rand;

pub use crate::basic_types::ConfigurationError;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::Random;
pub use crate::engine::EngineStatistics;
pub use crate::engine::PropagationPhase;
pub use crate::engine::State;
