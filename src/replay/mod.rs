//! Scripted gesture replay.
//!
//! Drives a [`Gamepad`](crate::gamepad::Gamepad) from a TOML list of pointer
//! events instead of a live touch screen:
//!
//! ```toml
//! [[events]]
//! kind = "start"
//! pointer = 1
//! x = 40.0
//! y = 40.0
//! target = "joystick_1"
//!
//! [[events]]
//! kind = "move"
//! pointer = 1
//! x = 70.0
//! y = 40.0
//! ```

pub mod error;
pub mod script;
pub mod session;

pub use error::ReplayError;
pub use script::{GestureKind, GestureScript, GestureStep};
pub use session::{replay, spawn_feeder, ReplayReport, ReplaySession};
