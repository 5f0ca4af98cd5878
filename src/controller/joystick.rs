//! Analog stick

use crate::controller::config::{Axis, ControllerConfig, ControllerKind};
use crate::controller::event::Point;
use crate::controller::state::ControllerState;
use crate::controller::strategy::ControlStrategy;
use crate::controller::surface::{KnobPosition, Surface};
use crate::utils::clamp;

/// Continuous stick: radial magnitude in `value`, per-axis values in
/// `axis_x` / `axis_y`
#[derive(Debug, Default, Clone, Copy)]
pub struct JoystickStrategy;

/// Signed single-axis value. "Up" is positive on the y axis.
pub(crate) fn single_axis_value(state: &ControllerState, config: &ControllerConfig) -> f64 {
    match config.axis {
        Axis::X => clamp(state.x_diff / config.radius, -1.0, 1.0),
        Axis::Y => clamp(-state.y_diff / config.radius, -1.0, 1.0),
        Axis::All => state.drag_distance / config.radius,
    }
}

/// Updates value, per-axis outputs and knob for a single-axis control
pub(crate) fn apply_single_axis(state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface) {
    let r = config.radius;
    state.value = single_axis_value(state, config);
    match config.axis {
        Axis::X => {
            state.axis_x = state.value;
            state.axis_y = 0.0;
            surface.move_knob(KnobPosition::At(Point::new(state.value * r + r, r)));
        }
        Axis::Y => {
            state.axis_x = 0.0;
            state.axis_y = -state.value;
            surface.move_knob(KnobPosition::At(Point::new(r, -state.value * r + r)));
        }
        Axis::All => {}
    }
}

/// Shared press/release behavior of the drag controls
pub(crate) fn start_drag_control(state: &mut ControllerState) {
    state.value = 0.0;
    state.axis_x = 0.0;
    state.axis_y = 0.0;
}

pub(crate) fn end_drag_control(state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface) {
    if !config.spring {
        return;
    }
    state.reset_outputs();
    surface.move_knob(KnobPosition::Center);
}

impl ControlStrategy for JoystickStrategy {
    fn on_start(&mut self, state: &mut ControllerState, _config: &ControllerConfig, _surface: &mut dyn Surface) {
        start_drag_control(state);
    }

    fn on_move(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface) {
        if config.axis != Axis::All {
            apply_single_axis(state, config, surface);
            return;
        }

        let r = config.radius;
        let (sin, cos) = state.angle.sin_cos();
        let x_offset = state.drag_distance * cos;
        let y_offset = state.drag_distance * sin;

        state.value = state.drag_distance / r;
        // contained by the ring: a full diagonal drag gives about ±0.707 per axis
        state.axis_x = clamp(x_offset / r, -1.0, 1.0);
        state.axis_y = clamp(y_offset / r, -1.0, 1.0);
        surface.move_knob(KnobPosition::At(Point::new(x_offset + r, y_offset + r)));
    }

    fn on_end(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface) {
        end_drag_control(state, config, surface);
    }

    fn yields_to_buttons(&self) -> bool {
        true
    }

    fn is_highlighted(&self, state: &ControllerState) -> bool {
        state.is_pressed
    }

    fn kind(&self) -> ControllerKind {
        ControllerKind::Joystick
    }
}
