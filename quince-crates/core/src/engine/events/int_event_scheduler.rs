use super::DomainEvent;
use super::DomainEvents;
use super::EventScheduler;
use super::WakeDistance;

const INSTANTIATE: u8 = 0;
const LOWER_BOUND: u8 = 1;
const UPPER_BOUND: u8 = 2;
const BOUNDS: u8 = 3;
const ANY: u8 = 4;

/// The [`EventScheduler`] of integer variables.
///
/// | interest                      | distance |
/// |-------------------------------|----------|
/// | instantiation                 | 0        |
/// | lower bound (+ instantiation) | 1        |
/// | upper bound (+ instantiation) | 2        |
/// | bounds (+ instantiation)      | 3        |
/// | anything including removals   | 4        |
#[derive(Debug, Clone, Default)]
pub struct IntEventScheduler {
    distances: &'static [u8],
    cursor: usize,
}

impl EventScheduler for IntEventScheduler {
    const NUM_DISTANCES: usize = 5;

    fn init(&mut self, event: DomainEvent) {
        self.cursor = 0;
        self.distances = match event {
            DomainEvent::Instantiate => &[INSTANTIATE, LOWER_BOUND, UPPER_BOUND, BOUNDS, ANY],
            DomainEvent::LowerBound => &[LOWER_BOUND, BOUNDS, ANY],
            DomainEvent::UpperBound => &[UPPER_BOUND, BOUNDS, ANY],
            DomainEvent::Removal => &[ANY],
            DomainEvent::AddToKernel | DomainEvent::RemoveFromEnvelope => {
                panic!("the set event {event:?} was dispatched to an integer variable")
            }
        };
    }

    fn has_next(&self) -> bool {
        self.cursor < self.distances.len()
    }

    fn select(&self, interest: DomainEvents) -> WakeDistance {
        if interest == DomainEvents::ALL {
            return WakeDistance::new(ANY);
        }

        assert!(
            !interest.is_empty() && interest.is_subset(DomainEvents::ANY_INT),
            "{interest:?} is not a valid interest mask for an integer variable"
        );

        let distance = if interest.contains(DomainEvent::Removal) {
            ANY
        } else {
            match (
                interest.contains(DomainEvent::LowerBound),
                interest.contains(DomainEvent::UpperBound),
            ) {
                (true, true) => BOUNDS,
                (true, false) => LOWER_BOUND,
                (false, true) => UPPER_BOUND,
                (false, false) => INSTANTIATE,
            }
        };
        WakeDistance::new(distance)
    }
}

impl Iterator for IntEventScheduler {
    type Item = WakeDistance;

    fn next(&mut self) -> Option<WakeDistance> {
        let distance = self.distances.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(WakeDistance::new(distance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::WakeDistances;

    fn distances_of(event: DomainEvent) -> Vec<usize> {
        let mut scheduler = IntEventScheduler::default();
        scheduler.init(event);
        scheduler.map(WakeDistance::index).collect()
    }

    #[test]
    fn instantiation_wakes_every_distance() {
        assert_eq!(vec![0, 1, 2, 3, 4], distances_of(DomainEvent::Instantiate));
    }

    #[test]
    fn bound_events_skip_the_opposite_bound() {
        assert_eq!(vec![1, 3, 4], distances_of(DomainEvent::LowerBound));
        assert_eq!(vec![2, 3, 4], distances_of(DomainEvent::UpperBound));
        assert_eq!(vec![4], distances_of(DomainEvent::Removal));
    }

    #[test]
    fn select_picks_most_specific_distance() {
        let scheduler = IntEventScheduler::default();

        assert_eq!(0, scheduler.select(DomainEvents::INSTANTIATE).index());
        assert_eq!(1, scheduler.select(DomainEvents::LOWER_BOUND).index());
        assert_eq!(2, scheduler.select(DomainEvents::UPPER_BOUND).index());
        assert_eq!(3, scheduler.select(DomainEvents::BOUNDS).index());
        assert_eq!(4, scheduler.select(DomainEvents::ANY_INT).index());
        assert_eq!(4, scheduler.select(DomainEvents::ALL).index());
        assert_eq!(
            4,
            scheduler.select(DomainEvent::Removal.into()).index()
        );
    }

    #[test]
    fn select_is_independent_of_scheduler_state() {
        let mut scheduler = IntEventScheduler::default();
        let before = scheduler.select(DomainEvents::BOUNDS);

        scheduler.init(DomainEvent::LowerBound);
        let _ = scheduler.next();

        assert_eq!(before, scheduler.select(DomainEvents::BOUNDS));
        assert_eq!(before, scheduler.select(DomainEvents::BOUNDS));
    }

    #[test]
    fn exhausted_scheduler_reports_no_next() {
        let mut scheduler = IntEventScheduler::default();
        assert!(!scheduler.has_next());

        scheduler.init(DomainEvent::Removal);
        assert!(scheduler.has_next());
        assert_eq!(Some(WakeDistance::new(4)), scheduler.next());
        assert!(!scheduler.has_next());
        assert_eq!(None, scheduler.next());
    }

    #[test]
    fn watchers_are_woken_by_every_event_they_cover() {
        let mut scheduler = IntEventScheduler::default();

        for interest in [
            DomainEvents::INSTANTIATE,
            DomainEvents::LOWER_BOUND,
            DomainEvents::UPPER_BOUND,
            DomainEvents::BOUNDS,
            DomainEvents::ANY_INT,
        ] {
            let distance = scheduler.select(interest);
            for event in interest.iter() {
                let woken = WakeDistances::collect(&mut scheduler, event.into());
                assert!(
                    woken.iter().any(|woken| woken == distance),
                    "{event:?} does not wake {interest:?}"
                );
            }
        }
    }

    #[test]
    fn lower_bound_does_not_wake_upper_bound_watchers() {
        let mut scheduler = IntEventScheduler::default();
        let upper_bound_distance = scheduler.select(DomainEvents::UPPER_BOUND);

        let woken = WakeDistances::collect(&mut scheduler, DomainEvent::LowerBound.into());

        assert!(woken.iter().all(|distance| distance != upper_bound_distance));
    }

    #[test]
    #[should_panic]
    fn set_interest_is_rejected() {
        let _ = IntEventScheduler::default().select(DomainEvents::KERNEL);
    }
}
