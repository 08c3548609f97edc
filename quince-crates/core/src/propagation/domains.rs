use crate::engine::trailed::TrailedInteger;
use crate::engine::variables::Assignments;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetDomainId;

pub(crate) mod private {
    use crate::engine::variables::Assignments;

    pub trait HasAssignments {
        fn assignments(&self) -> &Assignments;
    }
}

use private::HasAssignments;

/// Read access to the current domains, shared by every context handed to a propagator.
pub trait ReadDomains: HasAssignments {
    fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments().lower_bound(var)
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments().upper_bound(var)
    }

    fn contains(&self, var: DomainId, value: i32) -> bool {
        self.assignments().contains(var, value)
    }

    /// Returns `true` if the domain of the given variable is a singleton.
    fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments().is_fixed(var)
    }

    /// The number of values in the domain; up to 2^32 for a bounded domain.
    fn domain_size(&self, var: DomainId) -> u64 {
        self.assignments().size(var)
    }

    /// The values in the domain in increasing order.
    fn iterate_domain(&self, var: DomainId) -> impl Iterator<Item = i32> {
        self.assignments().iterate_domain(var)
    }

    fn kernel_contains(&self, var: SetDomainId, value: i32) -> bool {
        self.assignments().kernel_contains(var, value)
    }

    fn envelope_contains(&self, var: SetDomainId, value: i32) -> bool {
        self.assignments().envelope_contains(var, value)
    }

    fn kernel_size(&self, var: SetDomainId) -> u32 {
        self.assignments().kernel_size(var)
    }

    fn envelope_size(&self, var: SetDomainId) -> u32 {
        self.assignments().envelope_size(var)
    }

    /// Returns `true` if the kernel of the set variable equals its envelope.
    fn is_set_fixed(&self, var: SetDomainId) -> bool {
        self.assignments().is_set_fixed(var)
    }

    fn kernel_values(&self, var: SetDomainId) -> impl Iterator<Item = i32> {
        self.assignments().kernel_values(var)
    }

    fn envelope_values(&self, var: SetDomainId) -> impl Iterator<Item = i32> {
        self.assignments().envelope_values(var)
    }

    fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments().read_trailed_integer(trailed_integer)
    }
}

impl<T: HasAssignments> ReadDomains for T {}

/// A read-only view of the domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    pub(crate) assignments: &'a Assignments,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments) -> Self {
        Domains { assignments }
    }
}

impl HasAssignments for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}
