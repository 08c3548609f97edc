use enum_map::Enum;

/// The cost class of a propagator.
///
/// The driver maps each class onto a bucket of the fine and the coarse queue (see
/// [`crate::options::EngineOptions`]); lower buckets are drained first, so cheap propagators get to
/// filter before expensive ones are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Enum)]
pub enum Priority {
    Unary,
    Binary,
    Ternary,
    Linear,
    Quadratic,
    Cubic,
    VerySlow,
}
