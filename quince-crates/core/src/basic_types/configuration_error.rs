use thiserror::Error;

/// Errors raised while building a model: creating variables or posting constraints.
///
/// These are never raised during search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The coordinate and extent arrays passed to a constraint differ in length.
    #[error("expected {expected} entries for '{argument}', but {actual} were provided")]
    MismatchedLengths {
        argument: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A constraint which requires fixed extents received an unfixed one.
    #[error("the {argument} of box {index} must be fixed when the constraint is posted")]
    UnfixedExtent {
        argument: &'static str,
        index: usize,
    },
    /// A negative extent was provided.
    #[error("the {argument} of box {index} is negative ({value})")]
    NegativeExtent {
        argument: &'static str,
        index: usize,
        value: i32,
    },
    /// A coordinate whose bounds lie so close to the limits of `i32` that a box placed there
    /// would extend past them.
    #[error("the {argument} coordinate of box {index} is too close to the limits of i32")]
    CoordinateOutOfRange {
        argument: &'static str,
        index: usize,
    },
    /// An initial kernel value is missing from the initial envelope of a set variable.
    #[error("kernel value {value} is not part of the envelope")]
    KernelNotInEnvelope { value: i32 },
    /// A variable would be created with an empty domain.
    #[error("cannot create a variable with domain [{lower_bound}, {upper_bound}]")]
    EmptyDomain { lower_bound: i32, upper_bound: i32 },
}
