use chrono::{DateTime, Local};
use serde::Serialize;

/// One entry of the snapshot button list
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ButtonSnapshot {
    /// Logically on: held (spring) or toggled on (latching)
    pub pressed: bool,
    /// A pointer is currently on the button
    pub touched: bool,
    pub value: f64,
}

/// Read-only view of all controls, shaped like a standard gamepad report.
///
/// Buttons follow the registration order of button controls; axes hold one
/// `(x, y)` pair per joystick or d-pad, also in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamepadSnapshot {
    pub id: String,
    pub connected: bool,
    pub mapping: String,
    pub timestamp: DateTime<Local>,
    pub axes: Vec<f64>,
    pub buttons: Vec<ButtonSnapshot>,
}

impl GamepadSnapshot {
    pub fn button(&self, index: usize) -> Option<&ButtonSnapshot> {
        self.buttons.get(index)
    }

    /// The `(x, y)` pair of the n-th stick
    pub fn stick(&self, index: usize) -> Option<(f64, f64)> {
        let x = *self.axes.get(index * 2)?;
        let y = *self.axes.get(index * 2 + 1)?;
        Some((x, y))
    }
}
