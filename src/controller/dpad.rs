//! Directional pad: a joystick whose angle is quantized into sectors

use crate::controller::config::{Axis, ControllerConfig, ControllerKind};
use crate::controller::event::Point;
use crate::controller::joystick::{apply_single_axis, end_drag_control, start_drag_control};
use crate::controller::state::ControllerState;
use crate::controller::strategy::ControlStrategy;
use crate::controller::surface::{KnobPosition, Surface};
use std::f64::consts::TAU;

#[derive(Debug, Default, Clone, Copy)]
pub struct DPadStrategy;

/// Maps a normalized angle to its sector index.
///
/// Sector 0 is centered on angle 0 (pointing right), indices grow clockwise
/// on screen. Angles exactly between two sectors round half away from zero,
/// i.e. into the higher sector.
pub fn quantize_direction(angle: f64, directions: usize) -> usize {
    let sector = TAU / directions as f64;
    let index = (angle / sector).round() as usize;
    index % directions
}

/// Angle of the center of a sector
pub fn direction_center(direction: usize, directions: usize) -> f64 {
    direction as f64 * TAU / directions as f64
}

/// Drops float residue so cardinal directions give exact 0 / ±1
fn snap(component: f64) -> f64 {
    if component.abs() < 1e-12 {
        0.0
    } else {
        component
    }
}

impl ControlStrategy for DPadStrategy {
    fn on_start(&mut self, state: &mut ControllerState, _config: &ControllerConfig, _surface: &mut dyn Surface) {
        start_drag_control(state);
        state.direction = None;
        state.direction_angle = 0.0;
    }

    fn on_move(&mut self, state: &mut ControllerState, config: &ControllerConfig, surface: &mut dyn Surface) {
        // back on the press point: no direction
        if state.drag_distance > 0.0 {
            let direction = quantize_direction(state.angle, config.directions);
            state.direction = Some(direction);
            state.direction_angle = direction_center(direction, config.directions);
        } else {
            state.direction = None;
            state.direction_angle = 0.0;
        }

        if config.axis != Axis::All {
            apply_single_axis(state, config, surface);
            return;
        }

        let r = config.radius;
        state.value = state.drag_distance / r;

        if state.drag_distance > 0.0 {
            let (sin, cos) = state.direction_angle.sin_cos();
            state.axis_x = snap(cos);
            state.axis_y = snap(sin);
            surface.move_knob(KnobPosition::At(Point::new(r * state.axis_x + r, r * state.axis_y + r)));
        } else {
            state.axis_x = 0.0;
            state.axis_y = 0.0;
            surface.move_knob(KnobPosition::Center);
        }
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
        ControllerKind::DPad
    }
}
