use log::debug;
use quince_core::create_statistics_struct;
use quince_core::statistics::Statistic;
use quince_core::statistics::StatisticLogger;
use quince_core::termination::TerminationCondition;
use quince_core::variables::DomainId;
use quince_core::State;

create_statistics_struct!(SearchStatistics {
    num_decisions: usize,
    num_failures: usize,
    num_solutions: usize,
});

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// Every assignment has been explored.
    Exhausted,
    /// The callback asked to stop after a solution.
    SolutionLimitReached,
    /// The termination condition triggered.
    Stopped,
}

/// Depth-first search which labels the variables in the order they are given, trying the lower
/// bound first. On backtracking, the value that failed is excluded by raising the lower bound
/// one level up.
#[derive(Debug)]
pub(crate) struct DepthFirstSearch {
    variables: Vec<DomainId>,
    decisions: Vec<(DomainId, i32)>,
    statistics: SearchStatistics,
}

impl DepthFirstSearch {
    pub(crate) fn new(variables: Vec<DomainId>) -> Self {
        DepthFirstSearch {
            variables,
            decisions: vec![],
            statistics: SearchStatistics::default(),
        }
    }

    pub(crate) fn log_statistics(&self) {
        self.statistics.log(StatisticLogger::new(["search"]));
    }

    /// Runs the search from the current checkpoint. `on_solution` is called for every solution
    /// and returns whether the search should continue.
    pub(crate) fn solve(
        &mut self,
        state: &mut State,
        termination: &mut impl TerminationCondition,
        mut on_solution: impl FnMut(&State) -> bool,
    ) -> SearchOutcome {
        let mut is_consistent = state.propagate_to_fixed_point().is_ok();

        loop {
            if termination.should_stop() {
                return SearchOutcome::Stopped;
            }

            if is_consistent {
                match self.next_unfixed_variable(state) {
                    Some(variable) => {
                        is_consistent = self.decide(state, variable);
                        termination.decision_has_been_made();
                        continue;
                    }
                    None => {
                        self.statistics.num_solutions += 1;
                        if !on_solution(state) {
                            return SearchOutcome::SolutionLimitReached;
                        }
                    }
                }
            } else {
                self.statistics.num_failures += 1;
            }

            let Some((variable, value)) = self.decisions.pop() else {
                return SearchOutcome::Exhausted;
            };

            state.restore_to(state.get_checkpoint() - 1);
            debug!("excluding {value} from {variable}");
            is_consistent = state.update_lower_bound(variable, value + 1).is_ok()
                && state.propagate_to_fixed_point().is_ok();
        }
    }

    fn next_unfixed_variable(&self, state: &State) -> Option<DomainId> {
        self.variables
            .iter()
            .copied()
            .find(|&variable| !state.is_fixed(variable))
    }

    fn decide(&mut self, state: &mut State, variable: DomainId) -> bool {
        let value = state.lower_bound(variable);
        self.statistics.num_decisions += 1;
        self.decisions.push((variable, value));

        state.new_checkpoint();
        state.instantiate(variable, value).is_ok() && state.propagate_to_fixed_point().is_ok()
    }
}
