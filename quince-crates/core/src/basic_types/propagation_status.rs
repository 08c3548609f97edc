use thiserror::Error;

use crate::engine::variables::VariableId;
use crate::propagation::PropagatorId;

/// The result of invoking a propagator or of applying a domain operation. Failure aborts the
/// current fixpoint pass; only the search driver decides how to recover from it.
pub type PropagationStatus = Result<(), Contradiction>;

/// The current branch of the search cannot contain a solution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contradiction {
    /// A domain operation would have left the variable without values.
    #[error("the domain of {0} became empty")]
    EmptyDomain(VariableId),
    /// A propagator found the current domains to be inconsistent without emptying a domain itself.
    #[error("propagator {0} detected an inconsistency")]
    Propagator(PropagatorId),
}

/// Returned by the domain operations when they would empty a domain. The domain is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmptyDomain(pub(crate) VariableId);

impl From<EmptyDomain> for Contradiction {
    fn from(empty_domain: EmptyDomain) -> Self {
        Contradiction::EmptyDomain(empty_domain.0)
    }
}
