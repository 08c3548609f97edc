use super::DomainEvent;
use super::DomainEvents;

/// An abstract reason for which a watcher can be woken.
///
/// Watchers of a variable are grouped by the distance their interest mask was mapped to; the
/// distances implied by an event are all groups whose members must be woken by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WakeDistance(u8);

impl WakeDistance {
    pub const fn new(distance: u8) -> WakeDistance {
        WakeDistance(distance)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Maps events of one kind of variable onto wake distances.
///
/// After [`EventScheduler::init`] the scheduler yields, in a fixed order and without duplicates,
/// every distance implied by the event. The sequence is finite; iteration can only be restarted by
/// calling [`EventScheduler::init`] again.
pub trait EventScheduler: Iterator<Item = WakeDistance> {
    /// The number of distinct distances for this kind of variable.
    const NUM_DISTANCES: usize;

    /// Resets the cursor and loads the distances implied by `event`.
    ///
    /// Panics if `event` does not belong to this kind of variable.
    fn init(&mut self, event: DomainEvent);

    fn has_next(&self) -> bool;

    /// Returns the most specific distance which covers `interest`.
    ///
    /// Panics if `interest` cannot be served by this kind of variable; registering such a mask is a
    /// programming error in the propagator.
    fn select(&self, interest: DomainEvents) -> WakeDistance;
}

/// The union of the distances implied by a set of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WakeDistances(u8);

impl WakeDistances {
    pub(crate) fn collect<Scheduler: EventScheduler>(
        scheduler: &mut Scheduler,
        events: DomainEvents,
    ) -> WakeDistances {
        let mut distances = 0_u8;
        for event in events.iter() {
            scheduler.init(event);
            for distance in scheduler.by_ref() {
                distances |= 1 << distance.0;
            }
        }
        WakeDistances(distances)
    }

    /// The distances in increasing order.
    pub(crate) fn iter(self) -> impl Iterator<Item = WakeDistance> {
        (0..u8::BITS as u8)
            .filter(move |distance| self.0 & (1 << distance) != 0)
            .map(WakeDistance)
    }
}
