use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// How the domain of a variable changed.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// The integer domain became a single value.
    Instantiate,
    /// The lower bound of the integer domain increased.
    LowerBound,
    /// The upper bound of the integer domain decreased.
    UpperBound,
    /// A value strictly between the bounds of the integer domain was removed.
    Removal,
    /// A value was added to the kernel of a set domain.
    AddToKernel,
    /// A value was removed from the envelope of a set domain.
    RemoveFromEnvelope,
}

impl DomainEvent {
    pub fn is_integer_event(self) -> bool {
        DomainEvents::ANY_INT.contains(self)
    }

    pub fn is_set_event(self) -> bool {
        DomainEvents::ANY_SET.contains(self)
    }
}

/// A set of [`DomainEvent`]s.
///
/// Used both as the interest mask with which a propagator registers for a variable, and as the
/// accumulated mask of events pending for a variable or propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Only instantiation of the integer domain.
    pub const INSTANTIATE: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Instantiate));
    /// Increases of the lower bound, including those which instantiate the domain.
    pub const LOWER_BOUND: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::Instantiate | DomainEvent::LowerBound));
    /// Decreases of the upper bound, including those which instantiate the domain.
    pub const UPPER_BOUND: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::Instantiate | DomainEvent::UpperBound));
    /// Any bound change.
    pub const BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Instantiate | DomainEvent::LowerBound | DomainEvent::UpperBound
    ));
    /// Any change to an integer domain.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Instantiate
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    /// Growth of the kernel of a set domain.
    pub const KERNEL: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::AddToKernel));
    /// Shrinking of the envelope of a set domain.
    pub const ENVELOPE: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::RemoveFromEnvelope));
    /// Any change to a set domain.
    pub const ANY_SET: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::AddToKernel | DomainEvent::RemoveFromEnvelope
    ));
    /// Every event, whatever the kind of variable.
    pub const ALL: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Instantiate
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
            | DomainEvent::AddToKernel
            | DomainEvent::RemoveFromEnvelope
    ));

    pub(crate) const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn empty() -> DomainEvents {
        DomainEvents::default()
    }

    pub fn contains(&self, event: DomainEvent) -> bool {
        self.events.contains(event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_subset(&self, other: DomainEvents) -> bool {
        self.events.is_subset(other.events)
    }

    pub fn union(self, other: DomainEvents) -> DomainEvents {
        DomainEvents::new(self.events | other.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = DomainEvent> {
        self.events.iter()
    }
}

impl From<DomainEvent> for DomainEvents {
    fn from(event: DomainEvent) -> Self {
        DomainEvents::new(EnumSet::only(event))
    }
}
