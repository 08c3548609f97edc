use std::cmp::Reverse;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::rectangle::Region;
use super::Rectangle;
use crate::basic_types::Contradiction;
use crate::basic_types::PropagationStatus;
use crate::basic_types::Random;
use crate::create_statistics_struct;
use crate::engine::variables::DomainId;
use crate::propagation::Domains;
use crate::propagation::DomainEvents;
use crate::propagation::EnqueueDecision;
use crate::propagation::Entailment;
use crate::propagation::LocalId;
use crate::propagation::NotificationContext;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::propagation::TrailedInteger;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(
    /// Counters kept by a [`SweepNonOverlapPropagator`].
    SweepStatistics {
    /// The number of sweeps performed to find a new bound.
    num_sweeps: usize,
    /// The number of times a cached witness showed that a bound could not be tightened.
    num_witness_hits: usize,
    /// The number of fixed boxes which stopped being considered as obstacles.
    num_demotions: usize,
});

/// The axis filtered by a [`SweepNonOverlapPropagator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// The role of a box within the propagator; kept in a trailed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BoxStatus {
    /// Fixed, and disjoint from the area any active box can reach.
    Ignored = 0,
    /// Fixed; it obstructs the active boxes but is not filtered any more.
    Fixed = 1,
    /// Filtered, and obstructs the other boxes.
    Active = 2,
}

impl BoxStatus {
    fn read(context: &impl ReadDomains, trailed_integer: TrailedInteger) -> BoxStatus {
        match context.read(trailed_integer) {
            0 => BoxStatus::Ignored,
            1 => BoxStatus::Fixed,
            _ => BoxStatus::Active,
        }
    }
}

/// The reversible state of one box.
#[derive(Debug, Clone, Copy)]
struct BoxState {
    /// A `y` value at which the box fits when placed at the lower bound of its `x`.
    lower_witness: TrailedInteger,
    /// A `y` value at which the box fits when placed at the upper bound of its `x`.
    upper_witness: TrailedInteger,
    status: TrailedInteger,
}

/// Entering or leaving the forbidden region of an obstacle while sweeping over `x`. The range
/// `[y_min, y_max]` is the part of the region within the domain of the swept box.
#[derive(Debug, Clone, Copy)]
struct SweepEvent {
    position: i32,
    y_min: i32,
    y_max: i32,
    is_start: bool,
}

/// Tightens the `x` bounds of boxes such that no two boxes overlap, using a sweep over the
/// forbidden regions the other boxes induce \[1\].
///
/// For a box `i`, the forbidden region of another box `j` contains the positions of `i` which
/// overlap `j` wherever `j` is placed. To tighten the lower bound of `x_i`, the sweep moves from
/// that bound upwards and keeps, for every `y` in the domain of `y_i`, the number of forbidden
/// regions covering it; the first `x` at which some `y` is uncovered is the new lower bound, and
/// that `y` is cached as a witness. As long as the witness stays outside every forbidden region,
/// the bound holds and no sweep is needed. The upper bound is symmetric.
///
/// Boxes which are fixed only serve as obstacles. Fixed boxes which are disjoint from the area
/// the unfixed boxes can reach are ignored altogether.
///
/// The propagator only filters `x`; the constraint is completed by a second propagator which
/// receives the transposed rectangles.
///
/// # Bibliography
/// \[1\] N. Beldiceanu and M. Carlsson, ‘Sweep as a generic pruning technique applied to the
/// non-overlapping rectangles constraint’, in International Conference on Principles and Practice
/// of Constraint Programming, 2001, pp. 377–391.
#[derive(Debug, Clone)]
pub struct SweepNonOverlapPropagator {
    rectangles: Box<[Rectangle]>,
    axis: Axis,
    instantiation_only: bool,
    boxes: Vec<BoxState>,
    rng: Box<dyn Random>,
    /// Whether `rng` is replaced by a generator seeded by the engine once the propagator is
    /// added.
    seed_from_engine: bool,
    statistics: SweepStatistics,

    events: Vec<SweepEvent>,
    /// The number of forbidden regions covering each `y` in the domain of the swept box.
    slots: Vec<u32>,
    free_values: Vec<i32>,
}

impl PropagatorConstructor for SweepNonOverlapPropagator {
    type PropagatorImpl = Self;

    fn create(mut self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let domain_events = if self.instantiation_only {
            DomainEvents::INSTANTIATE
        } else {
            DomainEvents::BOUNDS
        };

        for (index, rectangle) in self.rectangles.iter().enumerate() {
            let local_id = LocalId::from(index as u32);
            context.register(rectangle.x, domain_events, local_id);
            context.register(rectangle.y, domain_events, local_id);
        }

        self.boxes = self
            .rectangles
            .iter()
            .map(|rectangle| {
                let initial_witness = context.domains().lower_bound(rectangle.y) as i64;
                BoxState {
                    lower_witness: context.new_trailed_integer(initial_witness),
                    upper_witness: context.new_trailed_integer(initial_witness),
                    status: context.new_trailed_integer(BoxStatus::Active as i64),
                }
            })
            .collect();
        if self.seed_from_engine {
            self.rng = Box::new(SmallRng::seed_from_u64(context.random_seed()));
        }

        self
    }
}

impl SweepNonOverlapPropagator {
    /// Creates the propagator for `axis`. For [`Axis::Y`], the rectangles should already be
    /// transposed.
    ///
    /// The coordinates are not checked; a box whose bounds lie within its largest extent of the
    /// limits of `i32` overflows. [`crate::constraints::non_overlap`] rejects such boxes.
    pub fn new(rectangles: Vec<Rectangle>, axis: Axis, instantiation_only: bool) -> Self {
        SweepNonOverlapPropagator {
            rectangles: rectangles.into_boxed_slice(),
            axis,
            instantiation_only,
            boxes: vec![],
            rng: Box::new(SmallRng::seed_from_u64(0)),
            seed_from_engine: true,
            statistics: SweepStatistics::default(),
            events: vec![],
            slots: vec![],
            free_values: vec![],
        }
    }

    /// Breaks ties with `rng` instead of a generator seeded by the engine.
    pub fn with_rng(mut self, rng: Box<dyn Random>) -> Self {
        self.rng = rng;
        self.seed_from_engine = false;
        self
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn statistics(&self) -> SweepStatistics {
        self.statistics
    }

    fn status(&self, context: &impl ReadDomains, index: usize) -> BoxStatus {
        BoxStatus::read(context, self.boxes[index].status)
    }

    /// The boxes other than `index` which obstruct it.
    fn obstacles<'a>(
        &'a self,
        context: &'a impl ReadDomains,
        index: usize,
    ) -> impl Iterator<Item = &'a Rectangle> + 'a {
        self.rectangles
            .iter()
            .enumerate()
            .filter(move |&(other, _)| {
                other != index && self.status(context, other) >= BoxStatus::Fixed
            })
            .map(|(_, rectangle)| rectangle)
    }

    /// Whether placing box `index` at `(x, witness)` avoids every forbidden region.
    fn is_witness_valid(
        &self,
        context: &impl ReadDomains,
        index: usize,
        x: i32,
        witness: i32,
    ) -> bool {
        let target = &self.rectangles[index];

        context.contains(target.y, witness)
            && self
                .obstacles(context, index)
                .all(|obstacle| !target.forbidden_region(obstacle, context).contains(x, witness))
    }

    fn tighten_lower_bound(
        &mut self,
        context: &mut PropagationContext,
        index: usize,
    ) -> Result<bool, Contradiction> {
        let target = self.rectangles[index];
        let lower_bound = context.lower_bound(target.x);
        let witness = context.read(self.boxes[index].lower_witness) as i32;

        if self.is_witness_valid(&*context, index, lower_bound, witness) {
            self.statistics.num_witness_hits += 1;
            return Ok(false);
        }

        self.statistics.num_sweeps += 1;
        let Some((new_lower_bound, witness)) = self.sweep(context, index, Direction::Up) else {
            return Err(context.conflict());
        };

        context.assign(self.boxes[index].lower_witness, witness as i64);
        context.update_lower_bound(target.x, new_lower_bound)
    }

    fn tighten_upper_bound(
        &mut self,
        context: &mut PropagationContext,
        index: usize,
    ) -> Result<bool, Contradiction> {
        let target = self.rectangles[index];
        let upper_bound = context.upper_bound(target.x);
        let witness = context.read(self.boxes[index].upper_witness) as i32;

        if self.is_witness_valid(&*context, index, upper_bound, witness) {
            self.statistics.num_witness_hits += 1;
            return Ok(false);
        }

        self.statistics.num_sweeps += 1;
        let Some((new_upper_bound, witness)) = self.sweep(context, index, Direction::Down) else {
            return Err(context.conflict());
        };

        context.assign(self.boxes[index].upper_witness, witness as i64);
        context.update_upper_bound(target.x, new_upper_bound)
    }

    /// Sweeps over the `x` domain of box `index` in the given direction, starting at the
    /// corresponding bound. Returns the first `x` at which the box fits, together with a `y`
    /// at which it fits, or `None` if it fits nowhere.
    fn sweep(
        &mut self,
        context: &PropagationContext,
        index: usize,
        direction: Direction,
    ) -> Option<(i32, i32)> {
        let target = self.rectangles[index];
        let reach = Region {
            x_min: context.lower_bound(target.x),
            x_max: context.upper_bound(target.x),
            y_min: context.lower_bound(target.y),
            y_max: context.upper_bound(target.y),
        };
        let start = match direction {
            Direction::Up => reach.x_min,
            Direction::Down => reach.x_max,
        };

        let mut events = std::mem::take(&mut self.events);
        events.clear();
        for obstacle in self.obstacles(context, index) {
            let region = target.forbidden_region(obstacle, context);
            if !region.intersects(&reach) {
                continue;
            }

            let y_min = region.y_min.max(reach.y_min);
            let y_max = region.y_max.min(reach.y_max);
            let (entry, exit) = match direction {
                Direction::Up => (region.x_min.max(reach.x_min), region.x_max + 1),
                Direction::Down => (region.x_max.min(reach.x_max), region.x_min - 1),
            };

            events.push(SweepEvent {
                position: entry,
                y_min,
                y_max,
                is_start: true,
            });
            if reach.x_min <= exit && exit <= reach.x_max {
                events.push(SweepEvent {
                    position: exit,
                    y_min,
                    y_max,
                    is_start: false,
                });
            }
        }

        match direction {
            Direction::Up => events.sort_by_key(|event| event.position),
            Direction::Down => events.sort_by_key(|event| Reverse(event.position)),
        }

        let start_is_free = events.first().map_or(true, |event| match direction {
            Direction::Up => event.position > start,
            Direction::Down => event.position < start,
        });

        let result = if start_is_free {
            Some((start, self.random_value(context, target.y)))
        } else {
            self.reset_slots(context, target.y);

            let mut result = None;
            for batch in events.chunk_by(|first, second| first.position == second.position) {
                for event in batch {
                    self.apply(event, reach.y_min);
                }

                if let Some(witness) = self.random_free_value(reach.y_min) {
                    result = Some((batch[0].position, witness));
                    break;
                }
            }
            result
        };

        self.events = events;
        result
    }

    fn reset_slots(&mut self, context: &PropagationContext, y: DomainId) {
        self.slots.clear();
        self.slots.extend(
            (context.lower_bound(y)..=context.upper_bound(y))
                .map(|value| u32::from(!context.contains(y, value))),
        );
    }

    fn apply(&mut self, event: &SweepEvent, offset: i32) {
        for value in event.y_min..=event.y_max {
            let slot = &mut self.slots[(value - offset) as usize];
            if event.is_start {
                *slot += 1;
            } else {
                *slot -= 1;
            }
        }
    }

    fn random_free_value(&mut self, offset: i32) -> Option<i32> {
        self.free_values.clear();
        self.free_values.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|&(_, &count)| count == 0)
                .map(|(slot, _)| offset + slot as i32),
        );

        if self.free_values.is_empty() {
            return None;
        }

        let chosen = self
            .rng
            .generate_usize_in_range(0..self.free_values.len());
        Some(self.free_values[chosen])
    }

    fn random_value(&mut self, context: &PropagationContext, y: DomainId) -> i32 {
        let size = usize::try_from(context.domain_size(y)).unwrap_or(usize::MAX);
        let chosen = self.rng.generate_usize_in_range(0..size);
        context
            .iterate_domain(y)
            .nth(chosen)
            .unwrap_or_else(|| context.lower_bound(y))
    }

    /// Fails if the fixed box `index` overlaps another fixed box.
    fn check_fixed_box(&self, context: &PropagationContext, index: usize) -> PropagationStatus {
        let target = &self.rectangles[index];
        let overlaps = self
            .rectangles
            .iter()
            .enumerate()
            .any(|(other, rectangle)| {
                other != index && rectangle.is_fixed(context) && target.overlaps(rectangle, context)
            });

        if overlaps {
            Err(context.conflict())
        } else {
            Ok(())
        }
    }

    /// Ignores the fixed boxes which lie outside the area any active box can reach.
    fn update_source_status(&mut self, context: &mut PropagationContext) {
        let domains = &*context;
        let active_reach = self
            .rectangles
            .iter()
            .enumerate()
            .filter(|&(index, _)| self.status(domains, index) == BoxStatus::Active)
            .map(|(_, rectangle)| rectangle.reach(domains))
            .filter(|reach| !reach.is_empty())
            .reduce(|first, second| Region {
                x_min: first.x_min.min(second.x_min),
                x_max: first.x_max.max(second.x_max),
                y_min: first.y_min.min(second.y_min),
                y_max: first.y_max.max(second.y_max),
            });

        for index in 0..self.rectangles.len() {
            if self.status(&*context, index) != BoxStatus::Fixed {
                continue;
            }

            let reach = self.rectangles[index].reach(&*context);
            if active_reach.map_or(true, |active_reach| !active_reach.intersects(&reach)) {
                context.assign(self.boxes[index].status, BoxStatus::Ignored as i64);
                self.statistics.num_demotions += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Propagator for SweepNonOverlapPropagator {
    fn name(&self) -> &str {
        match self.axis {
            Axis::X => "SweepNonOverlapX",
            Axis::Y => "SweepNonOverlapY",
        }
    }

    fn priority(&self) -> Priority {
        Priority::Quadratic
    }

    fn notify(
        &mut self,
        context: NotificationContext,
        local_id: LocalId,
        _events: DomainEvents,
    ) -> EnqueueDecision {
        if self.status(&context, local_id.unpack() as usize) == BoxStatus::Ignored {
            EnqueueDecision::Skip
        } else {
            EnqueueDecision::Enqueue
        }
    }

    fn propagate_from_scratch(&mut self, mut context: PropagationContext) -> PropagationStatus {
        loop {
            let mut filtered = false;

            for index in 0..self.rectangles.len() {
                if self.status(&context, index) != BoxStatus::Active {
                    continue;
                }

                filtered |= self.tighten_lower_bound(&mut context, index)?;
                filtered |= self.tighten_upper_bound(&mut context, index)?;

                if self.rectangles[index].is_fixed(&context) {
                    self.check_fixed_box(&context, index)?;
                    context.assign(self.boxes[index].status, BoxStatus::Fixed as i64);
                }
            }

            self.update_source_status(&mut context);

            if !filtered {
                return Ok(());
            }
        }
    }

    fn is_entailed(&self, domains: Domains) -> Entailment {
        let rectangles = &self.rectangles;

        for (index, rectangle) in rectangles.iter().enumerate() {
            if !rectangle.is_fixed(&domains) {
                continue;
            }

            let overlaps = rectangles[index + 1..]
                .iter()
                .any(|other| other.is_fixed(&domains) && rectangle.overlaps(other, &domains));
            if overlaps {
                return Entailment::False;
            }
        }

        if rectangles.iter().all(|rectangle| rectangle.is_fixed(&domains)) {
            Entailment::True
        } else {
            Entailment::Undefined
        }
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
