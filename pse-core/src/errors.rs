use std::io;
use thiserror::Error;

/// Error type for model construction, parameter handling and scaling configuration.
#[derive(Error, Debug)]
pub enum PseError {
    // generic error with custom message
    #[error("{0}")]
    Error(String),

    // errors related to model construction
    #[error("Block `{0}` already contains a component named `{1}`.")]
    DuplicateComponent(String, String),
    #[error("Block `{0}` has no component named `{1}`.")]
    ComponentNotFound(String, String),
    #[error("Invalid bounds for `{0}`: lower bound {1} is larger than upper bound {2}.")]
    InvalidBounds(String, f64, f64),

    // errors related to the scaling configuration
    #[error("At least one scaling basis has to be provided.")]
    EmptyScalingBasis,
    #[error(
        "The scaling basis '{0}' is not known. ['Value', 'Mid', 'Lower', 'Upper', 'VarScale', 'InverseVarScale']"
    )]
    UnknownScalingBasis(String),

    // errors related to file handling
    #[error(transparent)]
    FileIO(#[from] io::Error),

    // json errors
    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    // errors related to parameter handling
    #[error("The following component(s) were not found: {0}")]
    ComponentsNotFound(String),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
    #[error("Missing parameters: {0}")]
    MissingParameters(String),
}

/// Convenience type for `Result<T, PseError>`.
pub type PseResult<T> = Result<T, PseError>;
