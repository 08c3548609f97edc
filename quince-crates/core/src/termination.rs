//! Conditions polled by a search driver between decisions. Propagation itself is never
//! interrupted; a [`TerminationCondition`] only keeps the search from making its next decision.
use std::time::Duration;
use std::time::Instant;

/// Decides when a search gives up before it has explored every branch.
pub trait TerminationCondition {
    /// Whether the search should stop before its next decision.
    fn should_stop(&mut self) -> bool;

    /// Called by the search after every decision.
    fn decision_has_been_made(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(T::should_stop)
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made();
        }
    }
}

/// Lets the search run until it is done.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

/// Stops the search once a wall-clock deadline has passed.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    deadline: Instant,
}

impl TimeBudget {
    /// A deadline `budget` from now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            deadline: Instant::now() + budget,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Stops the search once it has made a given number of decisions.
#[derive(Clone, Copy, Debug)]
pub struct DecisionBudget {
    remaining: u64,
}

impl DecisionBudget {
    pub fn new(num_decisions: u64) -> Self {
        DecisionBudget {
            remaining: num_decisions,
        }
    }
}

impl TerminationCondition for DecisionBudget {
    fn should_stop(&mut self) -> bool {
        self.remaining == 0
    }

    fn decision_has_been_made(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Stops the search as soon as either of two conditions does. Both conditions see every
/// decision.
#[derive(Clone, Copy, Debug)]
pub struct Combinator<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> Combinator<First, Second> {
    pub fn new(first: First, second: Second) -> Self {
        Combinator { first, second }
    }
}

impl<First, Second> TerminationCondition for Combinator<First, Second>
where
    First: TerminationCondition,
    Second: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        // Both are polled so that neither misses a check.
        let first = self.first.should_stop();
        let second = self.second.should_stop();
        first || second
    }

    fn decision_has_been_made(&mut self) {
        self.first.decision_has_been_made();
        self.second.decision_has_been_made();
    }
}
