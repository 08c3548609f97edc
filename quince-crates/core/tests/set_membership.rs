#![cfg(test)]

use quince_core::constraints;
use quince_core::constraints::Constraint;
use quince_core::propagation::ReadDomains;
use quince_core::ConfigurationError;
use quince_core::State;

#[test]
fn elements_of_a_shared_set_follow_its_envelope() {
    let mut state = State::default();
    let set = state.new_set_variable(&[1, 3, 5, 7], &[], Some("s")).unwrap();
    let first = state.new_interval_variable(0, 8, None).unwrap();
    let second = state.new_interval_variable(4, 9, None).unwrap();
    constraints::set_member(first, set).post(&mut state).unwrap();
    constraints::set_member(second, set).post(&mut state).unwrap();

    assert!(state.propagate_to_fixed_point().is_ok());
    assert_eq!((1, 7), (state.lower_bound(first), state.upper_bound(first)));
    assert_eq!((5, 7), (state.lower_bound(second), state.upper_bound(second)));

    state.new_checkpoint();
    let _ = state.remove_from_envelope(set, 7).unwrap();
    assert!(state.propagate_to_fixed_point().is_ok());

    assert_eq!(Some(5), state.fixed_value(second));
    assert_eq!(5, state.upper_bound(first));
    assert!(state.domains().kernel_contains(set, 5));

    state.restore_to(0);
    assert!(!state.domains().kernel_contains(set, 5));
    assert!(state.domains().envelope_contains(set, 7));
}

#[test]
fn conflicting_memberships_fail() {
    let mut state = State::default();
    let set = state.new_set_variable(&[2, 4], &[], None).unwrap();
    let element = state.new_interval_variable(5, 9, None).unwrap();
    constraints::set_member(element, set).post(&mut state).unwrap();

    assert!(state.propagate_to_fixed_point().is_err());
}

#[test]
fn invalid_set_variables_are_rejected() {
    let mut state = State::default();

    assert_eq!(
        Err(ConfigurationError::KernelNotInEnvelope { value: 3 }),
        state.new_set_variable(&[1, 2], &[1, 3], None)
    );
    assert_eq!(
        Err(ConfigurationError::EmptyDomain {
            lower_bound: 4,
            upper_bound: 2,
        }),
        state.new_interval_variable(4, 2, None)
    );

    let set = state.new_set_variable(&[1], &[], Some("s")).unwrap();
    assert_eq!(Some("s"), state.variable_name(set));
}
