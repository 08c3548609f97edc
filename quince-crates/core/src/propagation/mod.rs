//! Contains the main building blocks for propagators.
//!
//! # Background
//!
//! A propagator takes as input a set of variables and their current domains, and removes values
//! which cannot take part in any solution of its constraint; the new domain of each variable is a
//! subset of the old one. A propagator is at fixpoint when applying it removes nothing, and it is
//! idempotent when a single call always reaches its fixpoint.
//!
//! # Practical
//!
//! Each concrete propagator implements [`Propagator`] and is created by a
//! [`PropagatorConstructor`]. The constructor registers the propagator for domain events through
//! the [`PropagatorConstructorContext`], and allocates the trailed integers which hold the state
//! that must be restored on backtracking.
//!
//! The propagator is added to a model through [`crate::State::add_propagator`], which schedules a
//! first full call. Every later call is triggered by an event on a registered variable.
//!
//! Propagators never hold on to domains; they read them from the context they are handed, which is
//! always up to date with respect to the events that caused the call.
mod constructor;
mod contexts;
mod domains;
mod entailment;
mod local_id;
mod priority;
mod propagator;
mod propagator_id;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::NotificationContext;
pub use contexts::PropagationContext;
pub use domains::Domains;
pub use domains::ReadDomains;
pub use entailment::Entailment;
pub use local_id::LocalId;
pub use priority::Priority;
pub use propagator::EnqueueDecision;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub use store::PropagatorHandle;

pub use crate::engine::events::DomainEvent;
pub use crate::engine::events::DomainEvents;
pub use crate::engine::trailed::TrailedInteger;
