use serde::{Deserialize, Serialize};
use std::fmt;

/// Device-assigned id of a single continuous contact (finger, pen, mouse)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub i64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a controller is in its press -> drag -> release cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,     // No pointer owned
    Pressed,  // Pointer captured, not moved yet
    Dragging, // Pointer moved since the press
}

/// Live state of one controller.
///
/// All coordinates are pixels relative to the controller's own frame.
/// Only the owning controller writes to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerState {
    pub is_pressed: bool,
    pub is_drag: bool,
    /// Highlighted / toggled-on state; latches across presses when spring is off
    pub is_active: bool,
    /// Button: 0 or 1. Joystick and d-pad: magnitude in [0, 1] on `all`,
    /// signed [-1, 1] on a single axis
    pub value: f64,
    /// Drag angle in [0, 2π), 0 pointing right, growing clockwise on screen
    pub angle: f64,
    pub x_start: f64,
    pub y_start: f64,
    pub x_drag: f64,
    pub y_drag: f64,
    pub x_diff: f64,
    pub y_diff: f64,
    /// Capped to the controller radius
    pub drag_distance: f64,
    /// Standard stick axes in [-1, 1], positive y pointing down
    pub axis_x: f64,
    pub axis_y: f64,
    /// D-pad sector index, `None` until the pointer moves
    pub direction: Option<usize>,
    /// Angle of the sector center
    pub direction_angle: f64,
    pub pointer_identifier: Option<PointerId>,
    pub is_initialized: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            is_pressed: false,
            is_drag: false,
            is_active: false,
            value: 0.0,
            angle: 0.0,
            x_start: 0.0,
            y_start: 0.0,
            x_drag: 0.0,
            y_drag: 0.0,
            x_diff: 0.0,
            y_diff: 0.0,
            drag_distance: 0.0,
            axis_x: 0.0,
            axis_y: 0.0,
            direction: None,
            direction_angle: 0.0,
            pointer_identifier: None,
            is_initialized: false,
        }
    }
}

impl ControllerState {
    pub fn phase(&self) -> GesturePhase {
        match (self.pointer_identifier, self.is_drag) {
            (None, _) => GesturePhase::Idle,
            (Some(_), false) => GesturePhase::Pressed,
            (Some(_), true) => GesturePhase::Dragging,
        }
    }

    pub fn owns(&self, pointer: PointerId) -> bool {
        self.pointer_identifier == Some(pointer)
    }

    /// Resets the drag geometry to a fresh press at `(x, y)`
    pub(crate) fn begin_gesture(&mut self, x: f64, y: f64) {
        self.x_start = x;
        self.y_start = y;
        self.x_drag = x;
        self.y_drag = y;
        self.x_diff = 0.0;
        self.y_diff = 0.0;
        self.drag_distance = 0.0;
        self.is_drag = false;
    }

    /// Neutral outputs, shared by the spring reset of the drag variants
    pub(crate) fn reset_outputs(&mut self) {
        self.value = 0.0;
        self.angle = 0.0;
        self.axis_x = 0.0;
        self.axis_y = 0.0;
        self.direction = None;
        self.direction_angle = 0.0;
    }
}
