use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use crate::engine::events::DomainEvents;
use crate::engine::events::EventScheduler;
use crate::engine::events::IntEventScheduler;
use crate::engine::events::SetEventScheduler;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::Assignments;
use crate::engine::variables::VariableId;
use crate::engine::variables::VariableKind;
use crate::engine::watch_lists::WatchLists;
use crate::engine::watch_lists::Watcher;

/// A propagator constructor creates a fully initialised instance of a [`Propagator`].
///
/// The constructor is responsible for indicating on which events the propagator should be woken.
/// Additionally, the propagator can be initialised with values that come from the current domains.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator + Clone;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// The communication point between a [`crate::State`] and a propagator which is being created.
///
/// Propagators use it to register for domain events, to read the current domains and to allocate
/// reversible cells for their own state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    assignments: &'a mut Assignments,
    watch_lists: &'a mut WatchLists,
    registered_variables: &'a mut Vec<VariableId>,
    propagator_id: PropagatorId,
    random_seed: u64,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        watch_lists: &'a mut WatchLists,
        registered_variables: &'a mut Vec<VariableId>,
        propagator_id: PropagatorId,
        random_seed: u64,
    ) -> Self {
        PropagatorConstructorContext {
            assignments,
            watch_lists,
            registered_variables,
            propagator_id,
            random_seed,
        }
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments)
    }

    /// Subscribes the propagator to the events in `domain_events` on `var`.
    ///
    /// The mask is translated once, here, into a wake distance by the scheduler of the variable
    /// kind. Panics if the mask does not fit the kind of variable.
    pub fn register(
        &mut self,
        var: impl Into<VariableId>,
        domain_events: DomainEvents,
        local_id: LocalId,
    ) {
        let variable = var.into();
        let distance = match self.assignments.kind(variable) {
            VariableKind::Integer => IntEventScheduler::default().select(domain_events),
            VariableKind::Set => SetEventScheduler::default().select(domain_events),
        };

        self.watch_lists.watch(
            variable,
            distance,
            Watcher {
                propagator: self.propagator_id,
                local_id,
            },
        );
        self.registered_variables.push(variable);
    }

    /// Allocates a reversible integer for the state of the propagator.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.assignments.new_trailed_integer(initial_value)
    }

    /// The seed from which propagators that break ties randomly should derive their generator.
    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}
