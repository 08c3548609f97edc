//! Pairwise non-overlap of axis-aligned rectangles with fixed extents.
//!
//! The constraint is enforced by two [`SweepNonOverlapPropagator`]s: one filtering the x
//! coordinates, and one filtering the y coordinates, which works on the transposed rectangles.
mod rectangle;
mod sweep_non_overlap_propagator;

pub use rectangle::Rectangle;
pub use sweep_non_overlap_propagator::Axis;
pub use sweep_non_overlap_propagator::SweepNonOverlapPropagator;
pub use sweep_non_overlap_propagator::SweepStatistics;
