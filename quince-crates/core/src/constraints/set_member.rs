use super::Constraint;
use crate::propagators::SetMemberPropagator;
use crate::variables::DomainId;
use crate::variables::SetDomainId;

/// Creates the [`Constraint`] `element ∈ set`.
pub fn set_member(element: DomainId, set: SetDomainId) -> impl Constraint {
    SetMemberPropagator::new(element, set)
}
