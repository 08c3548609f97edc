#![cfg(test)]

use quince_core::options::EngineOptions;
use quince_core::options::IdempotencyMode;
use quince_core::propagation::DomainEvents;
use quince_core::propagation::LocalId;
use quince_core::propagation::PropagationContext;
use quince_core::propagation::Propagator;
use quince_core::propagation::PropagatorConstructor;
use quince_core::propagation::PropagatorConstructorContext;
use quince_core::propagation::ReadDomains;
use quince_core::variables::DomainId;
use quince_core::PropagationStatus;
use quince_core::State;

/// Enforces `x <= y`, but lowers the upper bound of `x` by at most one per call. It only watches
/// `y`, so it is never woken by its own changes.
#[derive(Debug, Clone)]
struct OneStepAtATime {
    x: DomainId,
    y: DomainId,
}

impl PropagatorConstructor for OneStepAtATime {
    type PropagatorImpl = Self;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.y, DomainEvents::BOUNDS, LocalId::from(0));
        self
    }
}

impl Propagator for OneStepAtATime {
    fn name(&self) -> &str {
        "OneStepAtATime"
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let upper_bound = context.upper_bound(self.x);
        if upper_bound > context.upper_bound(self.y) {
            let _ = context.update_upper_bound(self.x, upper_bound - 1)?;
        }
        Ok(())
    }
}

fn set_up(idempotency: IdempotencyMode) -> (State, DomainId, DomainId) {
    let mut state = State::new(EngineOptions {
        idempotency,
        ..Default::default()
    });
    let x = state.new_interval_variable(0, 10, Some("x")).unwrap();
    let y = state.new_interval_variable(0, 5, Some("y")).unwrap();
    let _ = state.add_propagator(OneStepAtATime { x, y });

    (state, x, y)
}

#[test]
fn disabled_stops_when_the_queues_are_empty() {
    let (mut state, x, _) = set_up(IdempotencyMode::Disabled);

    assert!(state.propagate_to_fixed_point().is_ok());

    assert_eq!(9, state.upper_bound(x));
    assert_eq!(0, state.statistics().num_idempotency_violations);
}

#[test]
fn force_reruns_until_nothing_changes() {
    let (mut state, x, _) = set_up(IdempotencyMode::Force);

    assert!(state.propagate_to_fixed_point().is_ok());

    assert_eq!(5, state.upper_bound(x));
}

#[test]
fn error_reports_without_changing_domains() {
    let (mut state, x, _) = set_up(IdempotencyMode::Error);

    assert!(state.propagate_to_fixed_point().is_ok());

    assert_eq!(9, state.upper_bound(x));
    assert_eq!(1, state.statistics().num_idempotency_violations);
}

#[test]
fn error_accepts_idempotent_propagators() {
    let mut state = State::new(EngineOptions {
        idempotency: IdempotencyMode::Error,
        ..Default::default()
    });
    let x = state.new_interval_variable(0, 10, None).unwrap();
    let y = state.new_interval_variable(0, 10, None).unwrap();
    let _ = state.add_propagator(OneStepAtATime { x, y });

    assert!(state.propagate_to_fixed_point().is_ok());

    assert_eq!(10, state.upper_bound(x));
    assert_eq!(0, state.statistics().num_idempotency_violations);
}

#[test]
fn force_runs_again_after_a_decision() {
    let (mut state, x, y) = set_up(IdempotencyMode::Force);
    assert!(state.propagate_to_fixed_point().is_ok());

    state.new_checkpoint();
    let _ = state.update_upper_bound(y, 2).unwrap();
    assert!(state.propagate_to_fixed_point().is_ok());
    assert_eq!(2, state.upper_bound(x));

    state.restore_to(0);
    assert_eq!(5, state.upper_bound(x));
}
