use super::Constraint;
use crate::basic_types::ConfigurationError;
use crate::propagators::Axis;
use crate::propagators::SweepNonOverlapPropagator;
use crate::propagators::Rectangle;
use crate::variables::DomainId;
use crate::State;

/// Creates the [`Constraint`] stating that no two boxes overlap, where box `i` has its lower-left
/// corner at `(x[i], y[i])` and extents `widths[i]` by `heights[i]`.
///
/// Boxes only overlap if they share a positive area, so boxes with an extent of zero never
/// overlap. The extents must be fixed once the constraint is posted, and every box must stay
/// within the range of `i32` wherever it is placed.
///
/// The constraint is enforced by two sweep propagators, one per axis. By default they are called
/// whenever a bound changes; see [`NonOverlap::instantiation_only`].
pub fn non_overlap<X, Y, Widths, Heights>(
    x: X,
    y: Y,
    widths: Widths,
    heights: Heights,
) -> NonOverlap
where
    X: IntoIterator<Item = DomainId>,
    Y: IntoIterator<Item = DomainId>,
    Widths: IntoIterator<Item = DomainId>,
    Heights: IntoIterator<Item = DomainId>,
{
    NonOverlap {
        x: x.into_iter().collect(),
        y: y.into_iter().collect(),
        widths: widths.into_iter().collect(),
        heights: heights.into_iter().collect(),
        instantiation_only: false,
    }
}

/// The [`Constraint`] created by [`non_overlap`].
#[derive(Debug, Clone)]
pub struct NonOverlap {
    x: Vec<DomainId>,
    y: Vec<DomainId>,
    widths: Vec<DomainId>,
    heights: Vec<DomainId>,
    instantiation_only: bool,
}

impl NonOverlap {
    /// If `true`, the propagators are only called once coordinates are fixed. They filter less,
    /// but are called far less often.
    pub fn instantiation_only(mut self, instantiation_only: bool) -> Self {
        self.instantiation_only = instantiation_only;
        self
    }

    fn rectangles(&self, state: &State) -> Result<Vec<Rectangle>, ConfigurationError> {
        let expected = self.x.len();
        for (argument, actual) in [
            ("y", self.y.len()),
            ("widths", self.widths.len()),
            ("heights", self.heights.len()),
        ] {
            if actual != expected {
                return Err(ConfigurationError::MismatchedLengths {
                    argument,
                    expected,
                    actual,
                });
            }
        }

        let extent = |argument: &'static str,
                      index: usize,
                      variable: DomainId|
         -> Result<i32, ConfigurationError> {
            let value = state
                .fixed_value(variable)
                .ok_or(ConfigurationError::UnfixedExtent { argument, index })?;
            if value < 0 {
                return Err(ConfigurationError::NegativeExtent {
                    argument,
                    index,
                    value,
                });
            }
            Ok(value)
        };

        let mut rectangles = Vec::with_capacity(expected);
        for index in 0..expected {
            rectangles.push(Rectangle {
                x: self.x[index],
                y: self.y[index],
                width: extent("width", index, self.widths[index])?,
                height: extent("height", index, self.heights[index])?,
            });
        }

        let max_width = rectangles.iter().map(|rectangle| rectangle.width).max().unwrap_or(0);
        let max_height = rectangles.iter().map(|rectangle| rectangle.height).max().unwrap_or(0);
        for (index, rectangle) in rectangles.iter().enumerate() {
            for (argument, coordinate, max_extent) in [
                ("x", rectangle.x, max_width),
                ("y", rectangle.y, max_height),
            ] {
                // The sweep looks one position beyond the reach of every box.
                let margin = i64::from(max_extent) + 1;
                let lowest = i64::from(state.lower_bound(coordinate)) - margin;
                let highest = i64::from(state.upper_bound(coordinate)) + margin;
                if lowest < i64::from(i32::MIN) || highest > i64::from(i32::MAX) {
                    return Err(ConfigurationError::CoordinateOutOfRange { argument, index });
                }
            }
        }

        Ok(rectangles)
    }
}

impl Constraint for NonOverlap {
    fn post(self, state: &mut State) -> Result<(), ConfigurationError> {
        let rectangles = self.rectangles(state)?;
        let transposed = rectangles
            .iter()
            .map(|rectangle| rectangle.transposed())
            .collect();

        let _ = state.add_propagator(SweepNonOverlapPropagator::new(
            rectangles,
            Axis::X,
            self.instantiation_only,
        ));
        let _ = state.add_propagator(SweepNonOverlapPropagator::new(
            transposed,
            Axis::Y,
            self.instantiation_only,
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(state: &mut State, value: i32) -> DomainId {
        state.new_interval_variable(value, value, None).unwrap()
    }

    #[test]
    fn arrays_of_different_lengths_are_rejected() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 5, None).unwrap();
        let extent = fixed(&mut state, 1);

        let result = non_overlap([x, x], [x, x], [extent], [extent, extent]).post(&mut state);

        assert_eq!(
            Err(ConfigurationError::MismatchedLengths {
                argument: "widths",
                expected: 2,
                actual: 1,
            }),
            result
        );
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn extents_must_be_fixed() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 5, None).unwrap();
        let extent = fixed(&mut state, 1);
        let unfixed = state.new_interval_variable(1, 2, None).unwrap();

        let result = non_overlap([x, x], [x, x], [extent, extent], [extent, unfixed])
            .post(&mut state);

        assert_eq!(
            Err(ConfigurationError::UnfixedExtent {
                argument: "height",
                index: 1,
            }),
            result
        );
    }

    #[test]
    fn negative_extents_are_rejected() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 5, None).unwrap();
        let negative = fixed(&mut state, -1);

        let result = non_overlap([x], [x], [negative], [negative]).post(&mut state);

        assert_eq!(
            Err(ConfigurationError::NegativeExtent {
                argument: "width",
                index: 0,
                value: -1,
            }),
            result
        );
    }

    #[test]
    fn coordinates_near_the_limits_of_i32_are_rejected() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 5, None).unwrap();
        let y = state
            .new_interval_variable(i32::MAX - 3, i32::MAX - 1, None)
            .unwrap();
        let extent = fixed(&mut state, 2);

        let result = non_overlap([x, x], [x, y], [extent, extent], [extent, extent])
            .post(&mut state);

        assert_eq!(
            Err(ConfigurationError::CoordinateOutOfRange {
                argument: "y",
                index: 1,
            }),
            result
        );
        assert_eq!(0, state.num_propagators());
    }

    #[test]
    fn boxes_without_area_do_not_conflict() {
        let mut state = State::default();
        let x = [0, 1].map(|value| fixed(&mut state, value));
        let y = [0, 0].map(|value| fixed(&mut state, value));
        let widths = [2, 0].map(|value| fixed(&mut state, value));
        let heights = [2, 2].map(|value| fixed(&mut state, value));

        non_overlap(x, y, widths, heights).post(&mut state).unwrap();

        assert!(state.propagate_to_fixed_point().is_ok());
    }

    #[test]
    fn boxes_without_area_are_not_pushed_out() {
        let mut state = State::default();
        let x = [fixed(&mut state, 0), state.new_interval_variable(0, 3, None).unwrap()];
        let y = [fixed(&mut state, 0), state.new_interval_variable(0, 1, None).unwrap()];
        let widths = [4, 0].map(|value| fixed(&mut state, value));
        let heights = [2, 1].map(|value| fixed(&mut state, value));

        non_overlap(x, y, widths, heights).post(&mut state).unwrap();

        assert!(state.propagate_to_fixed_point().is_ok());
        assert_eq!((0, 3), (state.lower_bound(x[1]), state.upper_bound(x[1])));
        assert_eq!((0, 1), (state.lower_bound(y[1]), state.upper_bound(y[1])));
    }

    #[test]
    fn posting_adds_a_propagator_per_axis() {
        let mut state = State::default();
        let x = state.new_interval_variable(0, 5, None).unwrap();
        let y = state.new_interval_variable(0, 5, None).unwrap();
        let extent = fixed(&mut state, 1);

        let result = non_overlap([x], [y], [extent], [extent])
            .instantiation_only(true)
            .post(&mut state);

        assert!(result.is_ok());
        assert_eq!(2, state.num_propagators());
    }
}
