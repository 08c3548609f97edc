//! The fine (per variable) and coarse (per propagator) scheduling queues.
mod coarse_queue;
mod scheduling_queue;

pub(crate) use coarse_queue::CoarseCall;
pub(crate) use coarse_queue::CoarseQueue;
pub(crate) use scheduling_queue::SchedulingQueue;
