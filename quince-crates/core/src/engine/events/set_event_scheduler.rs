use super::DomainEvent;
use super::DomainEvents;
use super::EventScheduler;
use super::WakeDistance;

const KERNEL: u8 = 0;
const ENVELOPE: u8 = 1;
const ANY: u8 = 2;

/// The [`EventScheduler`] of set variables.
///
/// Adding a value to the kernel also settles it as no longer undecided, so it wakes the envelope
/// watchers as well as the kernel watchers.
#[derive(Debug, Clone, Default)]
pub struct SetEventScheduler {
    distances: &'static [u8],
    cursor: usize,
}

impl EventScheduler for SetEventScheduler {
    const NUM_DISTANCES: usize = 3;

    fn init(&mut self, event: DomainEvent) {
        self.cursor = 0;
        self.distances = match event {
            DomainEvent::AddToKernel => &[KERNEL, ENVELOPE, ANY],
            DomainEvent::RemoveFromEnvelope => &[ENVELOPE, ANY],
            DomainEvent::Instantiate
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal => {
                panic!("the integer event {event:?} was dispatched to a set variable")
            }
        };
    }

    fn has_next(&self) -> bool {
        self.cursor < self.distances.len()
    }

    fn select(&self, interest: DomainEvents) -> WakeDistance {
        let distance = if interest == DomainEvents::KERNEL {
            KERNEL
        } else if interest == DomainEvents::ENVELOPE {
            ENVELOPE
        } else if interest == DomainEvents::ANY_SET || interest == DomainEvents::ALL {
            ANY
        } else {
            panic!("{interest:?} is not a valid interest mask for a set variable")
        };
        WakeDistance::new(distance)
    }
}

impl Iterator for SetEventScheduler {
    type Item = WakeDistance;

    fn next(&mut self) -> Option<WakeDistance> {
        let distance = self.distances.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(WakeDistance::new(distance))
    }
}
