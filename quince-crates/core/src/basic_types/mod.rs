mod configuration_error;
mod propagation_status;
mod random;
mod trail;

pub use configuration_error::ConfigurationError;
pub use propagation_status::Contradiction;
pub(crate) use propagation_status::EmptyDomain;
pub use propagation_status::PropagationStatus;
pub use random::Random;
pub(crate) use trail::Trail;
