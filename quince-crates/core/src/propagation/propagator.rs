use downcast_rs::impl_downcast;
use downcast_rs::Downcast;
use dyn_clone::clone_trait_object;
use dyn_clone::DynClone;

use super::Domains;
use super::Entailment;
use super::LocalId;
use super::NotificationContext;
use super::Priority;
use super::PropagationContext;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::engine::events::EventScheduler;
use crate::engine::events::DomainEvents;
#[cfg(doc)]
use crate::options::IdempotencyMode;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Needed to go from `Box<dyn Propagator>` back to the concrete type behind a `PropagatorHandle`.
impl_downcast!(Propagator);

// The idempotency check runs a copy of the propagator, so `Box<dyn Propagator>` must be cloneable.
clone_trait_object!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution, or reports that
/// the current domains are inconsistent.
///
/// The only required functions are [`Propagator::name`] and [`Propagator::propagate_from_scratch`];
/// all other functions have default implementations which fall back to full propagation.
///
/// # Scheduling
/// A propagator registers an interest mask for each of its variables through
/// [`PropagatorConstructorContext::register`]. What happens when a registered variable changes
/// depends on [`Propagator::reacts_to_fine_events`]:
/// - coarse propagators (the default) are asked through [`Propagator::notify`] whether they want to
///   be enqueued; they are later run through [`Propagator::propagate`] with all events which
///   accumulated in the meantime, or through [`Propagator::propagate_from_scratch`] on their first
///   call and after too many events were coalesced;
/// - fine propagators are run immediately through [`Propagator::propagate_event`] for every
///   variable whose events are dispatched.
///
/// Propagators are not required to be idempotent; see [`IdempotencyMode`].
pub trait Propagator: Downcast + DynClone {
    /// Return the name of the propagator, used for logging.
    fn name(&self) -> &str;

    /// Determines in which queue bucket the propagator is scheduled.
    fn priority(&self) -> Priority {
        Priority::Linear
    }

    /// Propagates without relying on any incremental data.
    ///
    /// Should return [`Result::Err`] if any domain operation failed, or
    /// [`PropagationContext::conflict`] if the propagator detects an inconsistency itself.
    fn propagate_from_scratch(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Propagates after the events in `events` happened to (some of) the registered variables.
    ///
    /// By default this performs full propagation.
    fn propagate(&mut self, context: PropagationContext, events: DomainEvents) -> PropagationStatus {
        let _ = events;
        self.propagate_from_scratch(context)
    }

    /// Whether the propagator is run immediately for each changed variable through
    /// [`Propagator::propagate_event`] instead of being enqueued.
    fn reacts_to_fine_events(&self) -> bool {
        false
    }

    /// Propagates the events of the variable registered with `local_id`. Only called if
    /// [`Propagator::reacts_to_fine_events`] returns `true`.
    fn propagate_event(
        &mut self,
        context: PropagationContext,
        local_id: LocalId,
        events: DomainEvents,
    ) -> PropagationStatus {
        let _ = (local_id, events);
        self.propagate_from_scratch(context)
    }

    /// Called when the variable registered with `local_id` changed in a way the propagator is
    /// interested in. Decides whether the propagator should be enqueued.
    ///
    /// The wake distance computed by the [`EventScheduler`] guarantees that this is called at most
    /// once per dispatched variable.
    fn notify(
        &mut self,
        context: NotificationContext,
        local_id: LocalId,
        events: DomainEvents,
    ) -> EnqueueDecision {
        let _ = (context, local_id, events);
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, for state which is not kept in trailed integers.
    fn synchronise(&mut self, domains: Domains) {
        let _ = domains;
    }

    /// Whether the current domains already decide the constraint.
    fn is_entailed(&self, domains: Domains) -> Entailment {
        let _ = domains;
        Entailment::Undefined
    }

    /// Logs the statistics which the propagator keeps.
    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        let _ = statistic_logger;
    }
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}
