use crate::gamepad::GamepadError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Start event {0} has no target controller")]
    MissingTarget(usize),

    #[error("Event {0} has a non-finite coordinate")]
    NonFiniteCoordinate(usize),

    #[error("Vibrate event {0} has no pattern")]
    MissingPattern(usize),

    #[error("Gamepad error: {0}")]
    Gamepad(#[from] GamepadError),
}
