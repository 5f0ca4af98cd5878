//! Variant strategy interface.
//!
//! A [`Controller`](crate::controller::controller::Controller) owns the
//! gesture lifecycle; the strategy decides how a gesture turns into output.
//! The strategy is chosen from [`ControllerKind`] at construction and never
//! changes afterwards.

use crate::controller::button::ButtonStrategy;
use crate::controller::config::{ControllerConfig, ControllerKind};
use crate::controller::dpad::DPadStrategy;
use crate::controller::joystick::JoystickStrategy;
use crate::controller::state::ControllerState;
use crate::controller::surface::Surface;

/// Hooks run by the controller engine after it has updated the shared
/// gesture fields of the state
pub trait ControlStrategy {
    /// Runs after the pointer was captured and the start point recorded
    fn on_start(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface);

    /// Runs after diff, drag distance and angle were updated
    fn on_move(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface);

    /// Runs after the pointer was released
    fn on_end(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface);

    /// Whether moves are tracked at all
    fn tracks_drag(&self) -> bool {
        true
    }

    /// Whether presses landing on a button region are left to the button
    fn yields_to_buttons(&self) -> bool {
        false
    }

    /// Whether the surface shows the active look for this state
    fn is_highlighted(&self, state: &ControllerState) -> bool {
        state.is_active
    }

    fn kind(&self) -> ControllerKind;
}

impl ControllerKind {
    /// Creates the strategy implementing this kind
    pub fn create_strategy(self) -> Box<dyn ControlStrategy> {
        match self {
            ControllerKind::Button => Box::new(ButtonStrategy),
            ControllerKind::Joystick => Box::new(JoystickStrategy),
            ControllerKind::DPad => Box::new(DPadStrategy),
        }
    }
}
