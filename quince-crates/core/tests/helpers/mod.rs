//! Shared set-up for the integration tests of the engine.
#![allow(
    dead_code,
    reason = "each test binary uses a different subset of the helpers"
)]

use quince_core::constraints;
use quince_core::constraints::Constraint;
use quince_core::variables::DomainId;
use quince_core::State;

/// The variables of a packing instance; box `i` is `widths[i]` by `heights[i]` with its
/// lower-left corner at `(x[i], y[i])`.
#[derive(Debug, Clone)]
pub(crate) struct Packing {
    pub(crate) x: Vec<DomainId>,
    pub(crate) y: Vec<DomainId>,
    pub(crate) widths: Vec<i32>,
    pub(crate) heights: Vec<i32>,
}

impl Packing {
    pub(crate) fn coordinates(&self) -> Vec<DomainId> {
        self.x
            .iter()
            .zip(&self.y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }

    /// Whether the fixed boxes are pairwise disjoint.
    pub(crate) fn is_valid_placement(&self, state: &State) -> bool {
        let boxes = (0..self.x.len())
            .map(|index| {
                (
                    state.fixed_value(self.x[index]).expect("placement is fixed"),
                    state.fixed_value(self.y[index]).expect("placement is fixed"),
                    self.widths[index],
                    self.heights[index],
                )
            })
            .collect::<Vec<_>>();

        boxes.iter().enumerate().all(|(index, &(x, y, w, h))| {
            boxes[index + 1..].iter().all(|&(other_x, other_y, other_w, other_h)| {
                x + w <= other_x
                    || other_x + other_w <= x
                    || y + h <= other_y
                    || other_y + other_h <= y
            })
        })
    }
}

/// Posts a non-overlap constraint for the given boxes on a `width` by `height` board.
pub(crate) fn post_packing(
    state: &mut State,
    width: i32,
    height: i32,
    boxes: &[(i32, i32)],
    instantiation_only: bool,
) -> Packing {
    let mut packing = Packing {
        x: vec![],
        y: vec![],
        widths: vec![],
        heights: vec![],
    };
    let mut width_variables = vec![];
    let mut height_variables = vec![];

    for &(box_width, box_height) in boxes {
        packing
            .x
            .push(state.new_interval_variable(0, width - box_width, None).unwrap());
        packing
            .y
            .push(state.new_interval_variable(0, height - box_height, None).unwrap());
        packing.widths.push(box_width);
        packing.heights.push(box_height);
        width_variables.push(state.new_interval_variable(box_width, box_width, None).unwrap());
        height_variables.push(state.new_interval_variable(box_height, box_height, None).unwrap());
    }

    constraints::non_overlap(
        packing.x.clone(),
        packing.y.clone(),
        width_variables,
        height_variables,
    )
    .instantiation_only(instantiation_only)
    .post(state)
    .unwrap();

    packing
}

/// Counts the assignments to `variables` which survive propagation, labelling the variables in
/// order and their values in increasing order. Calls `on_solution` for each of them.
pub(crate) fn count_solutions(
    state: &mut State,
    variables: &[DomainId],
    on_solution: &mut impl FnMut(&State),
) -> usize {
    if state.propagate_to_fixed_point().is_err() {
        return 0;
    }

    let Some(&variable) = variables.iter().find(|&&variable| !state.is_fixed(variable)) else {
        on_solution(state);
        return 1;
    };

    let values = (state.lower_bound(variable)..=state.upper_bound(variable))
        .filter(|&value| state.contains(variable, value))
        .collect::<Vec<_>>();

    let mut num_solutions = 0;
    for value in values {
        let checkpoint = state.get_checkpoint();
        state.new_checkpoint();
        if state.instantiate(variable, value).is_ok() {
            num_solutions += count_solutions(state, variables, on_solution);
        }
        state.restore_to(checkpoint);
    }

    num_solutions
}

/// The bounds of every variable, in order.
pub(crate) fn bounds(state: &State, variables: &[DomainId]) -> Vec<(i32, i32)> {
    variables
        .iter()
        .map(|&variable| (state.lower_bound(variable), state.upper_bound(variable)))
        .collect()
}
