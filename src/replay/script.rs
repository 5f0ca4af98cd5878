use crate::controller::PointerEvent;
use crate::gamepad::VibrationPattern;
use crate::replay::error::ReplayError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Start,
    Move,
    End,
    Cancel,
    /// Click on the gamepad area (fullscreen binding)
    Click,
    Vibrate,
}

/// One line of a gesture script
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GestureStep {
    pub kind: GestureKind,
    #[serde(default)]
    pub pointer: i64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Controller a `start` lands on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default)]
    pub over_button: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<VibrationPattern>,
}

impl GestureStep {
    pub fn event(&self) -> PointerEvent {
        let event = PointerEvent::new(self.pointer, self.x, self.y);
        if self.over_button {
            event.over_button()
        } else {
            event
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GestureScript {
    #[serde(default)]
    pub events: Vec<GestureStep>,
}

impl GestureScript {
    /// Parses a script and checks that every press names its target and
    /// every coordinate is a real number
    pub fn from_toml_str(content: &str) -> Result<Self, ReplayError> {
        let script: GestureScript = toml::from_str(content)?;

        if let Some(index) = script
            .events
            .iter()
            .position(|step| step.kind == GestureKind::Start && step.target.is_none())
        {
            return Err(ReplayError::MissingTarget(index));
        }
        if let Some(index) = script
            .events
            .iter()
            .position(|step| !step.x.is_finite() || !step.y.is_finite())
        {
            return Err(ReplayError::NonFiniteCoordinate(index));
        }
        if let Some(index) = script
            .events
            .iter()
            .position(|step| step.kind == GestureKind::Vibrate && step.pattern.is_none())
        {
            return Err(ReplayError::MissingPattern(index));
        }

        debug!("Parsed gesture script with {} events", script.events.len());
        Ok(script)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ReplayError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }
}
