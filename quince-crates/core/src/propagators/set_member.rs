use crate::basic_types::PropagationStatus;
use crate::engine::variables::DomainId;
use crate::engine::variables::SetDomainId;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

const ELEMENT_ID: LocalId = LocalId::from(0);
const SET_ID: LocalId = LocalId::from(1);

/// Propagator for `element ∈ set`.
///
/// Once the element is fixed its value joins the kernel of the set, and values which leave the
/// envelope of the set are removed from the domain of the element. The propagator reacts to each
/// event directly, so only the side which changed is filtered.
#[derive(Debug, Clone)]
pub struct SetMemberPropagator {
    element: DomainId,
    set: SetDomainId,
}

impl SetMemberPropagator {
    pub fn new(element: DomainId, set: SetDomainId) -> Self {
        SetMemberPropagator { element, set }
    }

    fn add_fixed_element(&self, context: &mut PropagationContext) -> PropagationStatus {
        if context.is_fixed(self.element) {
            let value = context.lower_bound(self.element);
            let _ = context.add_to_kernel(self.set, value)?;
        }

        Ok(())
    }

    fn restrict_element_to_envelope(&self, context: &mut PropagationContext) -> PropagationStatus {
        let set = self.set;
        let supported = context
            .iterate_domain(self.element)
            .filter(|&value| context.envelope_contains(set, value))
            .collect::<Vec<_>>();
        let (Some(&lower_bound), Some(&upper_bound)) = (supported.first(), supported.last()) else {
            return Err(context.conflict());
        };

        let _ = context.update_lower_bound(self.element, lower_bound)?;
        let _ = context.update_upper_bound(self.element, upper_bound)?;

        let unsupported = context
            .iterate_domain(self.element)
            .filter(|&value| !context.envelope_contains(set, value))
            .collect::<Vec<_>>();
        for value in unsupported {
            let _ = context.remove_value(self.element, value)?;
        }

        Ok(())
    }
}

impl PropagatorConstructor for SetMemberPropagator {
    type PropagatorImpl = Self;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.element, DomainEvents::INSTANTIATE, ELEMENT_ID);
        context.register(self.set, DomainEvents::ENVELOPE, SET_ID);

        self
    }
}

impl Propagator for SetMemberPropagator {
    fn name(&self) -> &str {
        "SetMember"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn reacts_to_fine_events(&self) -> bool {
        true
    }

    fn propagate_event(
        &mut self,
        mut context: PropagationContext,
        local_id: LocalId,
        _events: DomainEvents,
    ) -> PropagationStatus {
        match local_id {
            ELEMENT_ID => self.add_fixed_element(&mut context),
            SET_ID => self.restrict_element_to_envelope(&mut context),
            _ => unreachable!("registered only the element and the set"),
        }
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.restrict_element_to_envelope(&mut context)?;
        self.add_fixed_element(&mut context)
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        if domains
            .iterate_domain(self.element)
            .all(|value| domains.kernel_contains(self.set, value))
        {
            Entailment::True
        } else if domains
            .iterate_domain(self.element)
            .all(|value| !domains.envelope_contains(self.set, value))
        {
            Entailment::False
        } else {
            Entailment::Undefined
        }
    }
}
