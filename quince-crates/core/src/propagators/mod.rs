//! Contains the propagator implementations that are used in Quince.
//!
//! See the [`crate::propagation`] for info on propagators.
pub(crate) mod non_overlap;
pub(crate) mod set_member;

pub use non_overlap::Axis;
pub use non_overlap::Rectangle;
pub use non_overlap::SweepNonOverlapPropagator;
pub use non_overlap::SweepStatistics;
pub use set_member::SetMemberPropagator;
