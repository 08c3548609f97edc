use super::DomainId;
use super::IntegerDomain;
use super::SetDomain;
use super::SetDomainId;
use super::VariableId;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::engine::events::DomainEvent;
use crate::engine::events::DomainEvents;
use crate::engine::events::EventSink;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariableKind {
    Integer,
    Set,
}

#[derive(Debug, Clone)]
enum Domain {
    Integer(IntegerDomain),
    Set(SetDomain),
}

/// Owns the reversible memory of a model: the domains of all variables as well as the trailed
/// integers of the propagators. Every successful shrink is recorded in the event sink.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assignments {
    trailed_values: TrailedValues,
    domains: KeyedVec<VariableId, Domain>,
    events: EventSink,
}

impl Assignments {
    pub(crate) fn new_integer_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        enumerated: bool,
    ) -> DomainId {
        let variable = self.domains.next_key();
        let domain = IntegerDomain::new(
            variable,
            &mut self.trailed_values,
            lower_bound,
            upper_bound,
            enumerated,
        );
        let _ = self.domains.push(Domain::Integer(domain));
        self.events.grow();

        DomainId { variable }
    }

    pub(crate) fn new_set_variable(&mut self, envelope: &[i32], kernel: &[i32]) -> SetDomainId {
        let variable = self.domains.next_key();
        let domain = SetDomain::new(variable, &mut self.trailed_values, envelope, kernel);
        let _ = self.domains.push(Domain::Set(domain));
        self.events.grow();

        SetDomainId { variable }
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn kind(&self, variable: VariableId) -> VariableKind {
        match self.domains[variable] {
            Domain::Integer(_) => VariableKind::Integer,
            Domain::Set(_) => VariableKind::Set,
        }
    }

    fn integer_domain(domains: &KeyedVec<VariableId, Domain>, domain: DomainId) -> &IntegerDomain {
        match &domains[domain.variable] {
            Domain::Integer(integer_domain) => integer_domain,
            Domain::Set(_) => unreachable!("a DomainId always refers to an integer variable"),
        }
    }

    fn set_domain(domains: &KeyedVec<VariableId, Domain>, domain: SetDomainId) -> &SetDomain {
        match &domains[domain.variable] {
            Domain::Set(set_domain) => set_domain,
            Domain::Integer(_) => unreachable!("a SetDomainId always refers to a set variable"),
        }
    }

    pub(crate) fn lower_bound(&self, domain: DomainId) -> i32 {
        Self::integer_domain(&self.domains, domain).lower_bound(&self.trailed_values)
    }

    pub(crate) fn upper_bound(&self, domain: DomainId) -> i32 {
        Self::integer_domain(&self.domains, domain).upper_bound(&self.trailed_values)
    }

    pub(crate) fn size(&self, domain: DomainId) -> u64 {
        Self::integer_domain(&self.domains, domain).size(&self.trailed_values)
    }

    pub(crate) fn contains(&self, domain: DomainId, value: i32) -> bool {
        Self::integer_domain(&self.domains, domain).contains(&self.trailed_values, value)
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        Self::integer_domain(&self.domains, domain).is_fixed(&self.trailed_values)
    }

    pub(crate) fn iterate_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        Self::integer_domain(&self.domains, domain).iter(&self.trailed_values)
    }

    pub(crate) fn kernel_contains(&self, domain: SetDomainId, value: i32) -> bool {
        Self::set_domain(&self.domains, domain).kernel_contains(&self.trailed_values, value)
    }

    pub(crate) fn envelope_contains(&self, domain: SetDomainId, value: i32) -> bool {
        Self::set_domain(&self.domains, domain).envelope_contains(&self.trailed_values, value)
    }

    pub(crate) fn kernel_size(&self, domain: SetDomainId) -> u32 {
        Self::set_domain(&self.domains, domain).kernel_size(&self.trailed_values)
    }

    pub(crate) fn envelope_size(&self, domain: SetDomainId) -> u32 {
        Self::set_domain(&self.domains, domain).envelope_size(&self.trailed_values)
    }

    pub(crate) fn is_set_fixed(&self, domain: SetDomainId) -> bool {
        Self::set_domain(&self.domains, domain).is_fixed(&self.trailed_values)
    }

    pub(crate) fn kernel_values(&self, domain: SetDomainId) -> impl Iterator<Item = i32> + '_ {
        Self::set_domain(&self.domains, domain).kernel_values(&self.trailed_values)
    }

    pub(crate) fn envelope_values(&self, domain: SetDomainId) -> impl Iterator<Item = i32> + '_ {
        Self::set_domain(&self.domains, domain).envelope_values(&self.trailed_values)
    }

    fn record(
        &mut self,
        variable: VariableId,
        outcome: Result<Option<DomainEvent>, EmptyDomain>,
    ) -> Result<bool, EmptyDomain> {
        let event = outcome?;
        if let Some(event) = event {
            log::trace!("{event:?} on {variable}");
            self.events.record(variable, event);
        }
        Ok(event.is_some())
    }

    pub(crate) fn update_lower_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let outcome = Self::integer_domain(&self.domains, domain)
            .update_lower_bound(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn update_upper_bound(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let outcome = Self::integer_domain(&self.domains, domain)
            .update_upper_bound(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn remove_value(&mut self, domain: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let outcome = Self::integer_domain(&self.domains, domain)
            .remove_value(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn instantiate(&mut self, domain: DomainId, value: i32) -> Result<bool, EmptyDomain> {
        let outcome = Self::integer_domain(&self.domains, domain)
            .instantiate(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn add_to_kernel(
        &mut self,
        domain: SetDomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let outcome = Self::set_domain(&self.domains, domain)
            .add_to_kernel(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn remove_from_envelope(
        &mut self,
        domain: SetDomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let outcome = Self::set_domain(&self.domains, domain)
            .remove_from_envelope(&mut self.trailed_values, value);
        self.record(domain.variable, outcome)
    }

    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub(crate) fn read_trailed_integer(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    pub(crate) fn assign_trailed_integer(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trailed_values.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trailed_values.get_checkpoint()
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trailed_values.synchronise(new_checkpoint)
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn drain_events(&mut self) -> impl Iterator<Item = (VariableId, DomainEvents)> + '_ {
        self.events.drain()
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear()
    }

    #[cfg(test)]
    pub(crate) fn trailed_snapshot(&self) -> Vec<i64> {
        self.trailed_values.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_operations_record_events() {
        let mut assignments = Assignments::default();
        let x = assignments.new_integer_variable(0, 5, true);
        let s = assignments.new_set_variable(&[1, 2], &[]);

        assert_eq!(Ok(true), assignments.update_lower_bound(x, 2));
        assert_eq!(Ok(false), assignments.update_lower_bound(x, 1));
        assert_eq!(Ok(true), assignments.add_to_kernel(s, 2));

        let events = assignments.drain_events().collect::<Vec<_>>();
        assert_eq!(
            vec![
                (x.variable, DomainEvent::LowerBound.into()),
                (s.variable, DomainEvent::AddToKernel.into())
            ],
            events
        );
        assert!(!assignments.has_pending_events());
    }

    #[test]
    fn failed_operations_record_nothing() {
        let mut assignments = Assignments::default();
        let x = assignments.new_integer_variable(0, 5, false);

        assert_eq!(Err(EmptyDomain(x.variable)), assignments.update_upper_bound(x, -1));
        assert!(!assignments.has_pending_events());
        assert_eq!(VariableKind::Integer, assignments.kind(x.variable));
    }
}
