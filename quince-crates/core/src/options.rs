//! The options which determine how a [`crate::State`] schedules its propagators.
use enum_map::enum_map;
use enum_map::EnumMap;

#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::Priority;

/// What the fixpoint driver does once both queues have run empty.
///
/// Propagators are not required to reach their own fixpoint in a single call; these modes trade
/// propagation strength against the cost of the extra calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum IdempotencyMode {
    /// Stop as soon as the queues are empty.
    #[default]
    Disabled,
    /// Re-run every propagator which was called during the pass on a copy, and log an error for
    /// those which would still change a domain. The domains are left as they were.
    Error,
    /// Re-run every propagator which was called during the pass through
    /// [`Propagator::propagate_from_scratch`], until no such call changes a domain.
    Force,
}

/// Options for the [`crate::State`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// The bucket of the fine (per variable) queue used for each priority. A variable is placed
    /// in the lowest bucket of the fine propagators watching it.
    pub fine_event_queues: EnumMap<Priority, usize>,
    /// The bucket of the coarse (per propagator) queue used for each priority.
    pub coarse_event_queues: EnumMap<Priority, usize>,
    pub idempotency: IdempotencyMode,
    /// The number of schedules which may be merged into a pending coarse call before it is
    /// upgraded to a call to [`Propagator::propagate_from_scratch`].
    pub coalescing_limit: usize,
    /// Integer variables with at most this many values keep track of holes; larger ones only
    /// keep their bounds.
    pub max_enumerated_domain_size: u32,
    /// Seed handed to propagators which break ties randomly.
    pub random_seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            fine_event_queues: enum_map! {
                Priority::Unary | Priority::Binary | Priority::Ternary => 0,
                Priority::Linear => 1,
                Priority::Quadratic | Priority::Cubic | Priority::VerySlow => 2,
            },
            coarse_event_queues: enum_map! {
                Priority::Unary | Priority::Binary | Priority::Ternary => 0,
                Priority::Linear => 1,
                Priority::Quadratic => 2,
                Priority::Cubic | Priority::VerySlow => 3,
            },
            idempotency: IdempotencyMode::default(),
            coalescing_limit: 16,
            max_enumerated_domain_size: 1 << 16,
            random_seed: 0,
        }
    }
}

impl EngineOptions {
    pub(crate) fn num_fine_buckets(&self) -> usize {
        Self::num_buckets(&self.fine_event_queues)
    }

    pub(crate) fn num_coarse_buckets(&self) -> usize {
        Self::num_buckets(&self.coarse_event_queues)
    }

    fn num_buckets(layout: &EnumMap<Priority, usize>) -> usize {
        layout.values().max().map_or(1, |bucket| bucket + 1)
    }
}
