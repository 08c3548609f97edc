use quince_core::ConfigurationError;
use thiserror::Error;

pub(crate) type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug)]
pub(crate) enum SolverError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The instance is invalid: {0}")]
    InvalidInstance(String),
    #[error("Failed to build the model, more details: {0}")]
    Configuration(#[from] ConfigurationError),
}
