//! Domain events and their translation into wake distances.
//!
//! A domain operation which shrinks a domain records a [`DomainEvent`]. Propagators do not register
//! for individual events; they register an interest mask ([`DomainEvents`]), which the
//! [`EventScheduler`] of the variable kind maps onto a single [`WakeDistance`]. When the events of a
//! variable are dispatched, the same scheduler enumerates every distance that the events imply,
//! so each interested watcher is woken exactly once.
mod domain_event;
mod event_scheduler;
mod event_sink;
mod int_event_scheduler;
mod set_event_scheduler;

pub use domain_event::DomainEvent;
pub use domain_event::DomainEvents;
pub use event_scheduler::EventScheduler;
pub use event_scheduler::WakeDistance;
pub(crate) use event_scheduler::WakeDistances;
pub(crate) use event_sink::EventSink;
pub use int_event_scheduler::IntEventScheduler;
pub use set_event_scheduler::SetEventScheduler;
