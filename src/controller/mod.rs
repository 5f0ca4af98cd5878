//! On-screen controls and their pointer state machine
//!
//! Every control is one [`Controller`](controller::Controller) engine plus a
//! variant strategy:
//!
//! 1. [`button`] - momentary or latching binary value
//! 2. [`joystick`] - continuous stick with radial and per-axis output
//! 3. [`dpad`] - stick quantized into direction sectors
//!
//! # Event flow
//!
//! ```text
//! PointerEvent ──► Controller ──► Strategy hooks ──► ControllerState ──► on_input
//!                      │
//!                      └──► Surface (mount, highlight, knob, capture)
//! ```
//!
//! Pointer ids are the only multi-touch discriminator: a controller follows
//! exactly one pointer from press to release and ignores all others.

pub mod button;
pub mod config;
pub mod controller;
pub mod dpad;
pub mod error;
pub mod event;
pub mod joystick;
pub mod state;
pub mod strategy;
pub mod surface;

pub use config::{Axis, ControllerConfig, ControllerKind, ControllerOptions, InputCallback, Position, Style};
pub use controller::Controller;
pub use error::ControllerError;
pub use event::{Point, PointerEvent};
pub use state::{ControllerState, GesturePhase, PointerId};
pub use strategy::ControlStrategy;
pub use surface::{HeadlessSurface, HeadlessSurfaceFactory, KnobPosition, Surface, SurfaceFactory, SurfaceProbe, SurfaceView};
