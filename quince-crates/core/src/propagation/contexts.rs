use super::domains::private::HasAssignments;
use super::PropagatorId;
#[cfg(doc)]
use super::ReadDomains;
use crate::basic_types::Contradiction;
use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::Assignments;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetDomainId;

/// Provided to a propagator when it is notified of a domain event.
///
/// Domains can be read through the implementation of [`ReadDomains`]; the propagator may update
/// its own trailed integers, but cannot change any domain.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    assignments: &'a mut Assignments,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments) -> Self {
        NotificationContext { assignments }
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.assignments
            .assign_trailed_integer(trailed_integer, value)
    }
}

impl HasAssignments for NotificationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

/// Provided to a propagator when it propagates.
///
/// Every domain operation follows the same contract: `Ok(false)` when the operation would not
/// shrink the domain, `Ok(true)` when it did, and a [`Contradiction`] when it would empty the
/// domain, in which case the domain is left untouched and the propagator should return the error.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    assignments: &'a mut Assignments,
    propagator_id: PropagatorId,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a mut Assignments, propagator_id: PropagatorId) -> Self {
        PropagationContext {
            assignments,
            propagator_id,
        }
    }

    pub fn update_lower_bound(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        Ok(self.assignments.update_lower_bound(var, value)?)
    }

    pub fn update_upper_bound(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        Ok(self.assignments.update_upper_bound(var, value)?)
    }

    pub fn remove_value(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        Ok(self.assignments.remove_value(var, value)?)
    }

    pub fn instantiate(&mut self, var: DomainId, value: i32) -> Result<bool, Contradiction> {
        Ok(self.assignments.instantiate(var, value)?)
    }

    pub fn add_to_kernel(&mut self, var: SetDomainId, value: i32) -> Result<bool, Contradiction> {
        Ok(self.assignments.add_to_kernel(var, value)?)
    }

    pub fn remove_from_envelope(
        &mut self,
        var: SetDomainId,
        value: i32,
    ) -> Result<bool, Contradiction> {
        Ok(self.assignments.remove_from_envelope(var, value)?)
    }

    pub fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.assignments
            .assign_trailed_integer(trailed_integer, value)
    }

    /// The contradiction to return when the propagator itself finds the domains inconsistent.
    pub fn conflict(&self) -> Contradiction {
        Contradiction::Propagator(self.propagator_id)
    }

    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            propagator_id: self.propagator_id,
        }
    }
}

impl HasAssignments for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
