//! Error definitions for the gamepad registry

use crate::controller::ControllerError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GamepadError {
    /// A controller with this id is already registered
    #[error("Duplicate controller id: {0}")]
    DuplicateId(String),

    /// A press was routed to an id that is not registered
    #[error("Unknown controller id: {0}")]
    UnknownController(String),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
}
