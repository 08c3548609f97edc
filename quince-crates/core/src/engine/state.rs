use fnv::FnvHashMap;

use crate::basic_types::ConfigurationError;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::create_statistics_struct;
use crate::engine::events::DomainEvents;
use crate::engine::events::EventScheduler;
use crate::engine::events::IntEventScheduler;
use crate::engine::events::SetEventScheduler;
use crate::engine::events::WakeDistances;
use crate::engine::queues::CoarseCall;
use crate::engine::queues::CoarseQueue;
use crate::engine::queues::SchedulingQueue;
use crate::engine::variables::Assignments;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetDomainId;
use crate::engine::variables::VariableId;
use crate::engine::variables::VariableKind;
use crate::engine::watch_lists::WatchLists;
use crate::options::EngineOptions;
use crate::options::IdempotencyMode;
use crate::propagation::store::PropagatorStore;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::NotificationContext;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::quince_assert_eq_simple;
use crate::quince_assert_simple;
use crate::statistics::log_statistic;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters kept by the [`State`] while propagating.
    EngineStatistics {
    /// The number of times any propagator entry point was invoked.
    num_propagator_calls: usize,
    /// The number of calls to [`State::propagate_to_fixed_point`].
    num_fixpoint_passes: usize,
    num_contradictions: usize,
    /// The number of propagators found to be non-idempotent under [`IdempotencyMode::Error`].
    num_idempotency_violations: usize,
    num_backtracks: usize,
});

/// Where the [`State`] is in its propagation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropagationPhase {
    /// No fixpoint pass has been started since the last checkpoint or backtrack.
    Idle,
    /// A fixpoint pass is in progress.
    Draining,
    /// The last fixpoint pass, or a decision, ran into a contradiction. Only
    /// [`State::restore_to`] is defined in this phase.
    Contradicted,
    /// The last fixpoint pass ended with both queues empty.
    Quiescent,
}

/// How a propagator is invoked.
#[derive(Debug, Clone, Copy)]
enum PropagatorCall {
    Full,
    Incremental(DomainEvents),
    Event(LocalId, DomainEvents),
}

impl From<CoarseCall> for PropagatorCall {
    fn from(call: CoarseCall) -> Self {
        match call {
            CoarseCall::Full => PropagatorCall::Full,
            CoarseCall::Incremental(events) => PropagatorCall::Incremental(events),
        }
    }
}

/// The container of variables and propagators, and the driver of propagation.
///
/// A search driver uses it in the following cycle:
/// 1. [`State::new_checkpoint`] before making a decision;
/// 2. a decision through one of the domain operations, e.g. [`State::update_upper_bound`];
/// 3. [`State::propagate_to_fixed_point`];
/// 4. on a [`Contradiction`], [`State::restore_to`] an earlier checkpoint.
///
/// # Example
/// ```
/// # use quince_core::State;
/// # use quince_core::options::EngineOptions;
/// let mut state = State::new(EngineOptions::default());
/// let x = state.new_interval_variable(0, 10, Some("x")).unwrap();
///
/// state.new_checkpoint();
/// let _ = state.update_lower_bound(x, 5).unwrap();
/// assert!(state.propagate_to_fixed_point().is_ok());
/// assert_eq!(5, state.lower_bound(x));
///
/// state.restore_to(0);
/// assert_eq!(0, state.lower_bound(x));
/// ```
#[derive(Debug, Clone)]
pub struct State {
    /// The domains of the variables and the trailed integers of the propagators.
    assignments: Assignments,
    propagators: PropagatorStore,
    watch_lists: WatchLists,
    /// Variables with pending events, in the bucket of their cheapest fine watcher.
    fine_queue: SchedulingQueue<VariableId>,
    /// Propagators which are waiting to be called.
    coarse_queue: CoarseQueue,
    /// The propagators which were called during the current fixpoint pass; only kept when the
    /// idempotency mode is not [`IdempotencyMode::Disabled`].
    executed: Vec<PropagatorId>,
    is_executed: KeyedVec<PropagatorId, bool>,
    variable_names: FnvHashMap<VariableId, String>,
    options: EngineOptions,
    phase: PropagationPhase,
    statistics: EngineStatistics,
}

impl Default for State {
    fn default() -> Self {
        State::new(EngineOptions::default())
    }
}

impl State {
    pub fn new(options: EngineOptions) -> State {
        State {
            assignments: Assignments::default(),
            propagators: PropagatorStore::default(),
            watch_lists: WatchLists::default(),
            fine_queue: SchedulingQueue::new(options.num_fine_buckets()),
            coarse_queue: CoarseQueue::new(options.num_coarse_buckets(), options.coalescing_limit),
            executed: vec![],
            is_executed: KeyedVec::default(),
            variable_names: FnvHashMap::default(),
            options,
            phase: PropagationPhase::Idle,
            statistics: EngineStatistics::default(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn phase(&self) -> PropagationPhase {
        self.phase
    }

    pub fn statistics(&self) -> EngineStatistics {
        self.statistics
    }

    pub fn num_variables(&self) -> usize {
        self.assignments.num_variables()
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// Logs the engine counters, followed by the statistics of every propagator.
    pub fn log_statistics(&self) {
        log_statistic("variables", self.num_variables());
        log_statistic("propagators", self.num_propagators());
        self.statistics.log(StatisticLogger::default());

        for (index, propagator) in self.propagators.iter().enumerate() {
            propagator.log_statistics(StatisticLogger::new([
                propagator.name(),
                "number",
                index.to_string().as_str(),
            ]));
        }
    }
}

/// Operations to create variables.
///
/// Variables created at a non-zero checkpoint do not disappear when backtracking past that
/// checkpoint.
impl State {
    /// Creates an integer variable with domain `[lower_bound, upper_bound]`.
    ///
    /// Domains with at most [`EngineOptions::max_enumerated_domain_size`] values keep track of
    /// holes; larger domains behave as with [`State::new_bounded_variable`].
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> Result<DomainId, ConfigurationError> {
        let size = upper_bound as i64 - lower_bound as i64 + 1;
        let enumerated = size <= self.options.max_enumerated_domain_size as i64;
        self.new_integer_variable(lower_bound, upper_bound, enumerated, name)
    }

    /// Creates an integer variable with domain `[lower_bound, upper_bound]` which only keeps track
    /// of its bounds; removing a value strictly between the bounds has no effect.
    pub fn new_bounded_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<&str>,
    ) -> Result<DomainId, ConfigurationError> {
        self.new_integer_variable(lower_bound, upper_bound, false, name)
    }

    fn new_integer_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        enumerated: bool,
        name: Option<&str>,
    ) -> Result<DomainId, ConfigurationError> {
        if lower_bound > upper_bound {
            return Err(ConfigurationError::EmptyDomain {
                lower_bound,
                upper_bound,
            });
        }

        let domain = self
            .assignments
            .new_integer_variable(lower_bound, upper_bound, enumerated);
        self.watch_lists.grow(IntEventScheduler::NUM_DISTANCES);
        self.add_name(domain.into(), name);

        Ok(domain)
    }

    /// Creates a set variable whose value lies between `kernel` and `envelope`.
    pub fn new_set_variable(
        &mut self,
        envelope: &[i32],
        kernel: &[i32],
        name: Option<&str>,
    ) -> Result<SetDomainId, ConfigurationError> {
        if let Some(&value) = kernel.iter().find(|value| !envelope.contains(value)) {
            return Err(ConfigurationError::KernelNotInEnvelope { value });
        }

        let domain = self.assignments.new_set_variable(envelope, kernel);
        self.watch_lists.grow(SetEventScheduler::NUM_DISTANCES);
        self.add_name(domain.into(), name);

        Ok(domain)
    }

    fn add_name(&mut self, variable: VariableId, name: Option<&str>) {
        if let Some(name) = name {
            let _ = self.variable_names.insert(variable, name.to_owned());
        }
    }

    pub fn variable_name(&self, variable: impl Into<VariableId>) -> Option<&str> {
        self.variable_names
            .get(&variable.into())
            .map(String::as_str)
    }
}

/// Operations to read the domains.
impl State {
    pub fn lower_bound(&self, variable: DomainId) -> i32 {
        self.assignments.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: DomainId) -> i32 {
        self.assignments.upper_bound(variable)
    }

    pub fn contains(&self, variable: DomainId, value: i32) -> bool {
        self.assignments.contains(variable, value)
    }

    pub fn is_fixed(&self, variable: DomainId) -> bool {
        self.assignments.is_fixed(variable)
    }

    pub fn fixed_value(&self, variable: DomainId) -> Option<i32> {
        self.is_fixed(variable)
            .then(|| self.assignments.lower_bound(variable))
    }

    /// A read-only view of all domains, including those of set variables.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.assignments)
    }
}

/// Operations which change domains outside of propagation, i.e. decisions.
///
/// They follow the contract of the operations on [`PropagationContext`]. A [`Contradiction`]
/// moves the state into [`PropagationPhase::Contradicted`].
impl State {
    pub fn update_lower_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.assignments
            .update_lower_bound(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }

    pub fn update_upper_bound(
        &mut self,
        variable: DomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.assignments
            .update_upper_bound(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }

    pub fn remove_value(&mut self, variable: DomainId, value: i32) -> Result<bool, Contradiction> {
        self.assignments
            .remove_value(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }

    pub fn instantiate(&mut self, variable: DomainId, value: i32) -> Result<bool, Contradiction> {
        self.assignments
            .instantiate(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }

    pub fn add_to_kernel(
        &mut self,
        variable: SetDomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.assignments
            .add_to_kernel(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }

    pub fn remove_from_envelope(
        &mut self,
        variable: SetDomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        self.assignments
            .remove_from_envelope(variable, value)
            .map_err(|empty_domain| self.contradiction(empty_domain.into()))
    }
}

/// Operations for adding and retrieving propagators.
impl State {
    /// Adds a propagator to the state. The constructor registers the propagator for the events
    /// on which it should be called.
    ///
    /// The propagator is scheduled for a call to [`Propagator::propagate_from_scratch`], but no
    /// propagation happens until [`State::propagate_to_fixed_point`] is called.
    ///
    /// Propagators can only be added at the root, i.e. at checkpoint 0.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        quince_assert_simple!(
            self.get_checkpoint() == 0,
            "Propagators can only be added at checkpoint 0"
        );

        let propagator_id = self.propagators.next_id();
        let mut registered_variables = vec![];
        let propagator = constructor.create(PropagatorConstructorContext::new(
            &mut self.assignments,
            &mut self.watch_lists,
            &mut registered_variables,
            propagator_id,
            self.options.random_seed,
        ));

        let priority = propagator.priority();
        if propagator.reacts_to_fine_events() {
            let bucket = self.options.fine_event_queues[priority];
            for variable in registered_variables {
                self.watch_lists.lower_fine_bucket(variable, bucket);
            }
        }

        let handle = self.propagators.push(propagator);
        quince_assert_eq_simple!(propagator_id, handle.propagator_id());

        self.coarse_queue
            .schedule_full(propagator_id, self.options.coarse_event_queues[priority]);

        handle
    }

    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Whether the current domains decide the constraint of the given propagator.
    pub fn is_entailed(&self, propagator: PropagatorId) -> Entailment {
        self.propagators[propagator].is_entailed(Domains::new(&self.assignments))
    }
}

/// Operations for checkpoints and propagation.
impl State {
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Creates a checkpoint which can later be returned to with [`State::restore_to`].
    ///
    /// Can only be called when all propagation has occurred.
    pub fn new_checkpoint(&mut self) {
        quince_assert_simple!(
            self.fine_queue.is_empty()
                && self.coarse_queue.is_empty()
                && !self.assignments.has_pending_events(),
            "Can only create a new checkpoint when all propagation has occurred"
        );

        self.assignments.new_checkpoint();
        self.phase = PropagationPhase::Idle;
    }

    /// Restores every domain and trailed integer to its value when `checkpoint` was created, and
    /// discards all pending work.
    ///
    /// Restoring to the current checkpoint only discards the pending work; domains changed since
    /// the checkpoint was created stay changed.
    pub fn restore_to(&mut self, checkpoint: usize) {
        quince_assert_simple!(checkpoint <= self.get_checkpoint());

        log::debug!(
            "restoring from checkpoint {} to {checkpoint}",
            self.get_checkpoint()
        );

        if checkpoint < self.get_checkpoint() {
            self.statistics.num_backtracks += 1;
            self.assignments.synchronise(checkpoint);
        }

        self.clear_pending_work();

        for propagator in self.propagators.iter_mut() {
            propagator.synchronise(Domains::new(&self.assignments));
        }

        self.phase = PropagationPhase::Idle;
    }

    /// Calls propagators until both queues are empty or a [`Contradiction`] is found.
    ///
    /// Variables with pending events are dispatched first, lowest bucket first: fine propagators
    /// are called immediately, coarse propagators are notified and possibly enqueued. When no
    /// variable is pending, the next propagator is taken from the coarse queue. What happens once
    /// both queues are empty is governed by [`EngineOptions::idempotency`].
    ///
    /// After a [`Contradiction`] only [`State::restore_to`] is defined.
    pub fn propagate_to_fixed_point(&mut self) -> PropagationStatus {
        quince_assert_simple!(
            self.phase != PropagationPhase::Contradicted,
            "Cannot propagate a contradicted state; restore to an earlier checkpoint first"
        );

        self.phase = PropagationPhase::Draining;
        self.statistics.num_fixpoint_passes += 1;

        match self.drain_queues() {
            Ok(()) => {
                self.clear_executed();
                self.phase = PropagationPhase::Quiescent;
                Ok(())
            }
            Err(contradiction) => Err(self.contradiction(contradiction)),
        }
    }

    fn drain_queues(&mut self) -> PropagationStatus {
        loop {
            self.flush_events();

            if let Some((variable, events)) = self.fine_queue.drain_next() {
                self.dispatch(variable, events)?;
                continue;
            }

            if let Some((propagator, call)) = self.coarse_queue.drain_next() {
                self.call_propagator(propagator, call.into())?;
                continue;
            }

            if !self.enforce_idempotency()? {
                return Ok(());
            }
        }
    }

    /// Moves the events recorded by the domains into the fine queue. Events on variables which
    /// nothing watches are dropped.
    fn flush_events(&mut self) {
        for (variable, events) in self.assignments.drain_events() {
            if !self.watch_lists.is_watched(variable) {
                continue;
            }

            log::trace!("scheduling {variable} for {events:?}");
            let bucket = self.watch_lists.fine_bucket(variable).unwrap_or(0);
            let _ = self.fine_queue.schedule(variable, bucket, events);
        }
    }

    /// Hands the events of a variable to every propagator watching one of the wake distances the
    /// events map to.
    fn dispatch(&mut self, variable: VariableId, events: DomainEvents) -> PropagationStatus {
        let distances = match self.assignments.kind(variable) {
            VariableKind::Integer => {
                WakeDistances::collect(&mut IntEventScheduler::default(), events)
            }
            VariableKind::Set => WakeDistances::collect(&mut SetEventScheduler::default(), events),
        };

        for distance in distances.iter() {
            let num_watchers = self.watch_lists.watchers(variable, distance).len();
            for index in 0..num_watchers {
                let watcher = self.watch_lists.watchers(variable, distance)[index];

                if self.propagators[watcher.propagator].reacts_to_fine_events() {
                    self.call_propagator(
                        watcher.propagator,
                        PropagatorCall::Event(watcher.local_id, events),
                    )?;
                    continue;
                }

                let propagator = &mut self.propagators[watcher.propagator];
                let decision = propagator.notify(
                    NotificationContext::new(&mut self.assignments),
                    watcher.local_id,
                    events,
                );
                if decision == EnqueueDecision::Enqueue {
                    let bucket = self.options.coarse_event_queues[propagator.priority()];
                    self.coarse_queue
                        .schedule(watcher.propagator, bucket, events);
                }
            }
        }

        Ok(())
    }

    fn call_propagator(
        &mut self,
        propagator_id: PropagatorId,
        call: PropagatorCall,
    ) -> PropagationStatus {
        self.statistics.num_propagator_calls += 1;
        self.mark_executed(propagator_id);

        let propagator = &mut self.propagators[propagator_id];
        log::trace!("calling {} ({propagator_id}): {call:?}", propagator.name());

        let context = PropagationContext::new(&mut self.assignments, propagator_id);
        match call {
            PropagatorCall::Full => propagator.propagate_from_scratch(context),
            PropagatorCall::Incremental(events) => propagator.propagate(context, events),
            PropagatorCall::Event(local_id, events) => {
                propagator.propagate_event(context, local_id, events)
            }
        }
    }

    /// Runs the idempotency check once both queues are empty. Returns whether new events were
    /// produced, in which case draining continues.
    fn enforce_idempotency(&mut self) -> Result<bool, Contradiction> {
        match self.options.idempotency {
            IdempotencyMode::Disabled => Ok(false),
            IdempotencyMode::Force => {
                for propagator_id in self.take_executed() {
                    self.call_propagator(propagator_id, PropagatorCall::Full)?;
                }
                Ok(self.assignments.has_pending_events())
            }
            IdempotencyMode::Error => {
                for propagator_id in self.take_executed() {
                    if !self.is_idempotent(propagator_id) {
                        self.statistics.num_idempotency_violations += 1;
                        log::error!(
                            "propagator {} ({propagator_id}) is not idempotent",
                            self.propagators[propagator_id].name()
                        );
                    }
                }
                Ok(false)
            }
        }
    }

    /// Runs a copy of the propagator from scratch under a temporary checkpoint, and reports
    /// whether that left every domain unchanged. The domains are restored afterwards.
    fn is_idempotent(&mut self, propagator_id: PropagatorId) -> bool {
        let mut propagator = dyn_clone::clone_box(&self.propagators[propagator_id]);

        let checkpoint = self.assignments.get_checkpoint();
        self.assignments.new_checkpoint();

        let status = propagator
            .propagate_from_scratch(PropagationContext::new(&mut self.assignments, propagator_id));
        let changed = self.assignments.has_pending_events();

        self.assignments.synchronise(checkpoint);
        self.assignments.clear_events();

        status.is_ok() && !changed
    }

    fn mark_executed(&mut self, propagator_id: PropagatorId) {
        if self.options.idempotency == IdempotencyMode::Disabled {
            return;
        }

        self.is_executed.accomodate(propagator_id, false);
        if !self.is_executed[propagator_id] {
            self.is_executed[propagator_id] = true;
            self.executed.push(propagator_id);
        }
    }

    fn take_executed(&mut self) -> Vec<PropagatorId> {
        let executed = std::mem::take(&mut self.executed);
        for &propagator_id in &executed {
            self.is_executed[propagator_id] = false;
        }
        executed
    }

    fn clear_executed(&mut self) {
        let _ = self.take_executed();
    }

    fn clear_pending_work(&mut self) {
        self.fine_queue.clear();
        self.coarse_queue.clear();
        self.assignments.clear_events();
        self.clear_executed();
    }

    /// Abandons the current pass; the branch is dead.
    fn contradiction(&mut self, contradiction: Contradiction) -> Contradiction {
        self.statistics.num_contradictions += 1;
        self.clear_pending_work();
        self.phase = PropagationPhase::Contradicted;

        log::debug!(
            "contradiction at checkpoint {}: {contradiction}",
            self.get_checkpoint()
        );

        contradiction
    }
}
