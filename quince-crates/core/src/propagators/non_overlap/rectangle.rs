use crate::engine::variables::DomainId;
use crate::propagation::ReadDomains;

/// A rectangle whose lower-left corner is `(x, y)`, with fixed extents.
///
/// Inside a [`super::SweepNonOverlapPropagator`] the swept axis is always `x`; the propagator for
/// the vertical axis receives [`Rectangle::transposed`] rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub x: DomainId,
    pub y: DomainId,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    /// The same rectangle with the roles of the axes swapped.
    pub fn transposed(self) -> Rectangle {
        Rectangle {
            x: self.y,
            y: self.x,
            width: self.height,
            height: self.width,
        }
    }

    /// A rectangle without area never overlaps anything.
    pub(crate) fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub(crate) fn is_fixed(&self, context: &impl ReadDomains) -> bool {
        context.is_fixed(self.x) && context.is_fixed(self.y)
    }

    /// The smallest area covering the rectangle at every position in its domain, as inclusive
    /// ranges `(x_min, x_max, y_min, y_max)`.
    pub(crate) fn reach(&self, context: &impl ReadDomains) -> Region {
        Region {
            x_min: context.lower_bound(self.x),
            x_max: context.upper_bound(self.x) + self.width - 1,
            y_min: context.lower_bound(self.y),
            y_max: context.upper_bound(self.y) + self.height - 1,
        }
    }

    /// Whether two fixed rectangles share a positive area.
    pub(crate) fn overlaps(&self, other: &Rectangle, context: &impl ReadDomains) -> bool {
        if !self.has_area() || !other.has_area() {
            return false;
        }

        let (x, y) = (context.lower_bound(self.x), context.lower_bound(self.y));
        let (other_x, other_y) = (context.lower_bound(other.x), context.lower_bound(other.y));

        x < other_x + other.width
            && other_x < x + self.width
            && y < other_y + other.height
            && other_y < y + self.height
    }

    /// The positions of the lower-left corner of `self` at which it overlaps `obstacle` wherever
    /// `obstacle` is placed within its domain. Empty if either rectangle has no area.
    pub(crate) fn forbidden_region(&self, obstacle: &Rectangle, context: &impl ReadDomains) -> Region {
        if !self.has_area() || !obstacle.has_area() {
            return Region::EMPTY;
        }

        Region {
            x_min: context.upper_bound(obstacle.x) - self.width + 1,
            x_max: context.lower_bound(obstacle.x) + obstacle.width - 1,
            y_min: context.upper_bound(obstacle.y) - self.height + 1,
            y_max: context.lower_bound(obstacle.y) + obstacle.height - 1,
        }
    }
}

/// An area of the plane with inclusive bounds; empty if a minimum exceeds its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub(crate) x_min: i32,
    pub(crate) x_max: i32,
    pub(crate) y_min: i32,
    pub(crate) y_max: i32,
}

impl Region {
    pub(crate) const EMPTY: Region = Region {
        x_min: 0,
        x_max: -1,
        y_min: 0,
        y_max: -1,
    };

    pub(crate) fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    pub(crate) fn contains(&self, x: i32, y: i32) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }

    pub(crate) fn intersects(&self, other: &Region) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x_min <= other.x_max
            && other.x_min <= self.x_max
            && self.y_min <= other.y_max
            && other.y_min <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::State;

    #[test]
    fn forbidden_region_is_the_compulsory_overlap() {
        let mut state = State::default();
        let target = Rectangle {
            x: state.new_interval_variable(0, 10, None).unwrap(),
            y: state.new_interval_variable(0, 10, None).unwrap(),
            width: 2,
            height: 3,
        };
        let obstacle = Rectangle {
            x: state.new_interval_variable(4, 5, None).unwrap(),
            y: state.new_interval_variable(1, 1, None).unwrap(),
            width: 4,
            height: 2,
        };

        let region = target.forbidden_region(&obstacle, &state.domains());

        assert_eq!(
            Region {
                x_min: 4,
                x_max: 7,
                y_min: -1,
                y_max: 2,
            },
            region
        );
        assert!(region.contains(4, 0));
        assert!(!region.contains(3, 0));
    }

    #[test]
    fn loose_obstacles_have_no_forbidden_region() {
        let mut state = State::default();
        let target = Rectangle {
            x: state.new_interval_variable(0, 10, None).unwrap(),
            y: state.new_interval_variable(0, 10, None).unwrap(),
            width: 2,
            height: 2,
        };
        let obstacle = Rectangle {
            x: state.new_interval_variable(0, 8, None).unwrap(),
            y: state.new_interval_variable(0, 0, None).unwrap(),
            width: 3,
            height: 1,
        };

        assert!(target.forbidden_region(&obstacle, &state.domains()).is_empty());
    }

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let mut state = State::default();
        let first = Rectangle {
            x: state.new_interval_variable(0, 0, None).unwrap(),
            y: state.new_interval_variable(0, 0, None).unwrap(),
            width: 2,
            height: 2,
        };
        let second = Rectangle {
            x: state.new_interval_variable(2, 2, None).unwrap(),
            y: state.new_interval_variable(1, 1, None).unwrap(),
            width: 2,
            height: 2,
        };

        assert!(!first.overlaps(&second, &state.domains()));
        assert!(!second.overlaps(&first, &state.domains()));
        assert!(first.overlaps(&first, &state.domains()));
    }

    #[test]
    fn rectangles_without_area_never_obstruct() {
        let mut state = State::default();
        let square = Rectangle {
            x: state.new_interval_variable(0, 0, None).unwrap(),
            y: state.new_interval_variable(0, 0, None).unwrap(),
            width: 2,
            height: 2,
        };
        let line = Rectangle {
            x: state.new_interval_variable(1, 1, None).unwrap(),
            y: state.new_interval_variable(0, 0, None).unwrap(),
            width: 0,
            height: 2,
        };
        let domains = state.domains();

        assert!(!square.overlaps(&line, &domains));
        assert!(!line.overlaps(&square, &domains));
        assert!(!line.overlaps(&line, &domains));
        assert!(square.forbidden_region(&line, &domains).is_empty());
        assert!(line.forbidden_region(&square, &domains).is_empty());
    }
}
