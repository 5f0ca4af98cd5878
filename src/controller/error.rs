//! Error definitions for controller construction

use thiserror::Error;

/// Errors raised while building a controller from its options
#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    /// No id was given, or the id is blank
    #[error("Controller id is missing or blank")]
    MissingId,

    /// Radius must be a finite, positive number of pixels
    #[error("Invalid radius for controller '{id}': {radius}")]
    InvalidRadius { id: String, radius: f64 },

    /// A d-pad needs at least two sectors
    #[error("Invalid direction count for controller '{id}': {directions}")]
    InvalidDirections { id: String, directions: usize },
}
