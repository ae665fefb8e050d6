//! Error types for submitting a simulation
//!
//! Every variant is terminal for the submission that produced it: nothing is
//! retried and the adopted response is left untouched.

use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, SimulationError>;

/// Malformed or missing input, detected before any remote call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a valid angle (degrees).")]
    MissingAngle,

    #[error("Please enter at least one valid angle.")]
    NoAngles,

    #[error("'{0}' is not a valid angle.")]
    UnparsableAngle(String),

    #[error("Angles must be finite numbers.")]
    NonFiniteAngle,

    #[error("Throw mode takes exactly one angle, got {0}.")]
    TooManyAngles(usize),

    #[error("Velocity must be a number of at least 0.")]
    InvalidVelocity,

    #[error("Gravity must be positive.")]
    InvalidGravity,

    #[error("Time step must be positive.")]
    InvalidTimestep,
}

/// Errors that can occur while exchanging parameters for a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Non-success reply; carries the service's message or a generic one
    #[error("{0}")]
    Server(String),

    /// The request never produced a reply
    #[error("Could not reach the simulation service ({0})")]
    Transport(String),
}

impl SimulationError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SimulationError::Validation(_))
    }
}
