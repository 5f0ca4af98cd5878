//! On-screen virtual gamepad controls.
//!
//! Pointer gestures go in, normalized input values come out. A [`Gamepad`]
//! owns a set of [`Controller`]s (joystick, button, d-pad), routes pointer
//! events to them and aggregates their state into a [`GamepadSnapshot`].
//!
//! ```text
//! PointerEvent ──► Gamepad ──► Controller ──► [ControlStrategy] ──► ControllerState
//!                     │                              │                    │
//!                     ▼                              ▼                    ▼
//!                   Host                          Surface          on_input / snapshot
//! ```

pub mod controller;
pub mod gamepad;
pub mod layout;
pub mod replay;
pub mod utils;

pub use controller::{
    Axis, Controller, ControllerConfig, ControllerError, ControllerKind, ControllerOptions,
    ControllerState, PointerEvent, PointerId,
};
pub use gamepad::{Gamepad, GamepadError, GamepadSnapshot, HeadlessHost, Host, VibrationPattern};
pub use layout::{Layout, LayoutError};
