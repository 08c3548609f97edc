use super::SchedulingQueue;
use crate::containers::KeyedVec;
use crate::engine::events::DomainEvents;
use crate::propagation::PropagatorId;

/// How a propagator drained from the coarse queue should be run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoarseCall {
    /// Through [`crate::propagation::Propagator::propagate_from_scratch`].
    Full,
    /// Through [`crate::propagation::Propagator::propagate`] with the accumulated events.
    Incremental(DomainEvents),
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingCall {
    num_coalesced: usize,
    full: bool,
}

/// The per-propagator queue.
///
/// Once more than `coalescing_limit` schedules have been merged into one pending entry, the
/// incremental data is considered too stale and the call is upgraded to a full one.
#[derive(Debug, Clone)]
pub(crate) struct CoarseQueue {
    queue: SchedulingQueue<PropagatorId>,
    pending_calls: KeyedVec<PropagatorId, PendingCall>,
    coalescing_limit: usize,
}

impl CoarseQueue {
    pub(crate) fn new(num_buckets: usize, coalescing_limit: usize) -> CoarseQueue {
        CoarseQueue {
            queue: SchedulingQueue::new(num_buckets),
            pending_calls: KeyedVec::default(),
            coalescing_limit,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn schedule(&mut self, propagator: PropagatorId, bucket: usize, events: DomainEvents) {
        self.pending_calls
            .accomodate(propagator, PendingCall::default());

        if self.queue.schedule(propagator, bucket, events) {
            return;
        }

        let pending_call = &mut self.pending_calls[propagator];
        pending_call.num_coalesced += 1;
        if pending_call.num_coalesced > self.coalescing_limit {
            pending_call.full = true;
        }
    }

    pub(crate) fn schedule_full(&mut self, propagator: PropagatorId, bucket: usize) {
        self.pending_calls
            .accomodate(propagator, PendingCall::default());

        let _ = self.queue.schedule(propagator, bucket, DomainEvents::empty());
        self.pending_calls[propagator].full = true;
    }

    pub(crate) fn drain_next(&mut self) -> Option<(PropagatorId, CoarseCall)> {
        let (propagator, events) = self.queue.drain_next()?;
        let pending_call = std::mem::take(&mut self.pending_calls[propagator]);

        let call = if pending_call.full {
            CoarseCall::Full
        } else {
            CoarseCall::Incremental(events)
        };
        Some((propagator, call))
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
        self.pending_calls
            .iter_mut()
            .for_each(|pending_call| *pending_call = PendingCall::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;
    use crate::engine::events::DomainEvent;

    #[test]
    fn first_call_is_full() {
        let mut queue = CoarseQueue::new(1, 4);
        let propagator = PropagatorId::create_from_index(0);

        queue.schedule_full(propagator, 0);
        queue.schedule(propagator, 0, DomainEvents::BOUNDS);

        assert_eq!(Some((propagator, CoarseCall::Full)), queue.drain_next());
        assert!(queue.is_empty());
    }

    #[test]
    fn events_are_coalesced_into_one_call() {
        let mut queue = CoarseQueue::new(1, 4);
        let propagator = PropagatorId::create_from_index(2);

        queue.schedule(propagator, 0, DomainEvent::LowerBound.into());
        queue.schedule(propagator, 0, DomainEvent::UpperBound.into());

        let Some((_, CoarseCall::Incremental(events))) = queue.drain_next() else {
            panic!("expected an incremental call");
        };
        assert!(events.contains(DomainEvent::LowerBound) && events.contains(DomainEvent::UpperBound));
        assert_eq!(None, queue.drain_next());
    }

    #[test]
    fn too_many_coalesced_events_force_a_full_call() {
        let mut queue = CoarseQueue::new(1, 2);
        let propagator = PropagatorId::create_from_index(0);

        for _ in 0..4 {
            queue.schedule(propagator, 0, DomainEvents::INSTANTIATE);
        }
        assert_eq!(Some((propagator, CoarseCall::Full)), queue.drain_next());

        // The counter starts over for the next entry.
        queue.schedule(propagator, 0, DomainEvents::INSTANTIATE);
        assert_eq!(
            Some((propagator, CoarseCall::Incremental(DomainEvents::INSTANTIATE))),
            queue.drain_next()
        );
    }
}
