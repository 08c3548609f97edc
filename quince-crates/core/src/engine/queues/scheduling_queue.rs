use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::events::DomainEvents;
use crate::quince_assert_moderate;

/// A queue of keys with accumulated event masks, partitioned into buckets.
///
/// Scheduling a key which is already pending merges the new events into its mask and keeps its
/// position; otherwise the key is appended to its bucket. Keys are drained from the lowest
/// non-empty bucket, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct SchedulingQueue<Key> {
    buckets: Vec<VecDeque<Key>>,
    pending: KeyedVec<Key, Option<DomainEvents>>,
    present_buckets: BinaryHeap<Reverse<usize>>,
    num_pending: usize,
}

impl<Key: StorageKey> SchedulingQueue<Key> {
    pub(crate) fn new(num_buckets: usize) -> SchedulingQueue<Key> {
        SchedulingQueue {
            buckets: vec![VecDeque::new(); num_buckets],
            pending: KeyedVec::default(),
            present_buckets: BinaryHeap::new(),
            num_pending: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_pending == 0
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, key: Key) -> bool {
        self.pending.get(key).is_some_and(Option::is_some)
    }

    /// Returns `true` if the key was not pending before.
    pub(crate) fn schedule(&mut self, key: Key, bucket: usize, events: DomainEvents) -> bool {
        quince_assert_moderate!(bucket < self.buckets.len());

        self.pending.accomodate(key, None);
        if let Some(pending_events) = &mut self.pending[key] {
            *pending_events = pending_events.union(events);
            return false;
        }

        self.pending[key] = Some(events);
        self.num_pending += 1;

        if self.buckets[bucket].is_empty() {
            self.present_buckets.push(Reverse(bucket));
        }
        self.buckets[bucket].push_back(key);

        true
    }

    pub(crate) fn drain_next(&mut self) -> Option<(Key, DomainEvents)> {
        let Reverse(bucket) = *self.present_buckets.peek()?;
        quince_assert_moderate!(!self.buckets[bucket].is_empty());

        let key = self.buckets[bucket].pop_front()?;
        if self.buckets[bucket].is_empty() {
            let _ = self.present_buckets.pop();
        }

        self.num_pending -= 1;
        let events = self.pending[key].take().unwrap_or_default();

        Some((key, events))
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(bucket)) = self.present_buckets.pop() {
            for key in self.buckets[bucket].drain(..) {
                self.pending[key] = None;
            }
        }
        self.num_pending = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::events::DomainEvent;

    #[test]
    fn lowest_bucket_is_drained_first() {
        let mut queue: SchedulingQueue<usize> = SchedulingQueue::new(3);

        let _ = queue.schedule(4, 2, DomainEvents::ANY_INT);
        let _ = queue.schedule(1, 0, DomainEvents::ANY_INT);
        let _ = queue.schedule(3, 1, DomainEvents::ANY_INT);

        let order = std::iter::from_fn(|| queue.drain_next().map(|(key, _)| key)).collect::<Vec<_>>();
        assert_eq!(vec![1, 3, 4], order);
    }

    #[test]
    fn keys_in_one_bucket_are_fifo() {
        let mut queue: SchedulingQueue<usize> = SchedulingQueue::new(1);

        for key in [5, 2, 7, 0] {
            let _ = queue.schedule(key, 0, DomainEvents::BOUNDS);
        }

        let order = std::iter::from_fn(|| queue.drain_next().map(|(key, _)| key)).collect::<Vec<_>>();
        assert_eq!(vec![5, 2, 7, 0], order);
        assert!(queue.is_empty());
    }

    #[test]
    fn rescheduling_merges_masks_and_keeps_position() {
        let mut queue: SchedulingQueue<usize> = SchedulingQueue::new(1);

        assert!(queue.schedule(0, 0, DomainEvent::LowerBound.into()));
        assert!(queue.schedule(1, 0, DomainEvent::Removal.into()));
        assert!(!queue.schedule(0, 0, DomainEvent::UpperBound.into()));

        let (key, events) = queue.drain_next().unwrap();
        assert_eq!(0, key);
        assert!(events.contains(DomainEvent::LowerBound));
        assert!(events.contains(DomainEvent::UpperBound));
        assert!(!events.contains(DomainEvent::Removal));

        assert_eq!(Some((1, DomainEvent::Removal.into())), queue.drain_next());
        assert_eq!(None, queue.drain_next());
    }

    #[test]
    fn drained_keys_can_be_scheduled_again() {
        let mut queue: SchedulingQueue<usize> = SchedulingQueue::new(2);

        let _ = queue.schedule(0, 1, DomainEvents::KERNEL);
        let _ = queue.drain_next();

        assert!(!queue.is_pending(0));
        assert!(queue.schedule(0, 1, DomainEvents::ENVELOPE));
        assert_eq!(Some((0, DomainEvents::ENVELOPE)), queue.drain_next());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut queue: SchedulingQueue<usize> = SchedulingQueue::new(2);
        let _ = queue.schedule(0, 1, DomainEvents::KERNEL);
        let _ = queue.schedule(1, 0, DomainEvents::KERNEL);

        queue.clear();

        assert!(queue.is_empty());
        assert!(!queue.is_pending(0));
        assert_eq!(None, queue.drain_next());
        assert!(queue.schedule(0, 0, DomainEvents::ENVELOPE));
    }
}
