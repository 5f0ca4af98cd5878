use crate::controller::config::{ControllerConfig, ControllerKind, ControllerOptions, InputCallback};
use crate::controller::error::ControllerError;
use crate::controller::event::{Point, PointerEvent};
use crate::controller::state::{ControllerState, GesturePhase};
use crate::controller::strategy::ControlStrategy;
use crate::controller::surface::Surface;
use crate::utils::{distance, normalize_angle};
use std::fmt;
use tracing::{debug, info, trace};

/// One on-screen control and its gesture state machine.
///
/// The engine owns the press -> drag -> release lifecycle and the shared
/// geometry (start point, diff, capped drag distance, angle). How that
/// geometry becomes output is left to the variant strategy.
pub struct Controller {
    config: ControllerConfig,
    state: ControllerState,
    strategy: Box<dyn ControlStrategy>,
    surface: Box<dyn Surface>,
    /// Surface origin at the press; the whole gesture is measured from it
    frame: Point,
    on_input: Option<InputCallback>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Builds a controller from user options, failing fast on a missing id
    /// or an unusable radius.
    pub fn new(options: ControllerOptions, surface: Box<dyn Surface>) -> Result<Self, ControllerError> {
        let (config, on_input) = ControllerConfig::resolve(options)?;
        Ok(Self::from_config(config, on_input, surface))
    }

    /// Builds a controller from an already resolved configuration
    pub fn from_config(
        config: ControllerConfig,
        on_input: Option<InputCallback>,
        surface: Box<dyn Surface>,
    ) -> Self {
        debug!("Created {} controller '{}'", config.kind, config.id);
        Self {
            strategy: config.kind.create_strategy(),
            config,
            state: ControllerState::default(),
            surface,
            frame: Point::ORIGIN,
            on_input,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn kind(&self) -> ControllerKind {
        self.strategy.kind()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.phase()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized
    }

    /// Replaces the input callback
    pub fn set_on_input(&mut self, callback: impl FnMut(&ControllerState) + 'static) {
        self.on_input = Some(InputCallback::new(callback));
    }

    /// Mounts the controller on its surface with a fresh state. Calling it on
    /// an initialized controller tears the old binding down first.
    pub fn init(&mut self) {
        if self.state.is_initialized {
            self.destroy();
        }

        self.state = ControllerState {
            is_initialized: true,
            ..ControllerState::default()
        };
        self.surface.mount(&self.config);
        info!("Initialized {} controller '{}'", self.config.kind, self.config.id);
    }

    /// Unmounts the controller and drops any captured pointer. Safe to call
    /// more than once.
    pub fn destroy(&mut self) {
        if !self.state.is_initialized {
            return;
        }

        if let Some(pointer) = self.state.pointer_identifier.take() {
            self.surface.release_pointer(pointer);
        }
        self.state.is_pressed = false;
        self.state.is_drag = false;
        self.state.is_initialized = false;
        self.surface.unmount();
        info!("Destroyed controller '{}'", self.config.id);
    }

    /// Converts client coordinates into the frame of the current gesture
    fn local_point(&self, event: &PointerEvent) -> Point {
        event.position - self.frame
    }

    fn notify(&mut self) {
        if let Some(callback) = &mut self.on_input {
            callback.call(&self.state);
        }
    }

    fn refresh_highlight(&mut self) {
        let highlighted = self.strategy.is_highlighted(&self.state);
        self.surface.set_active(highlighted);
    }

    /// Press. Returns whether the event was taken by this controller.
    pub fn handle_start(&mut self, event: &PointerEvent) -> bool {
        if !self.state.is_initialized {
            trace!("'{}' is not initialized, ignoring start", self.config.id);
            return false;
        }
        if let Some(owner) = self.state.pointer_identifier {
            trace!(
                "'{}' already owned by {}, ignoring start of {}",
                self.config.id,
                owner,
                event.pointer_id
            );
            return false;
        }
        if !event.position.is_finite() {
            trace!("'{}' ignoring start at non-finite position", self.config.id);
            return false;
        }
        if event.over_button && self.strategy.yields_to_buttons() {
            trace!("'{}' leaves start over a button alone", self.config.id);
            return false;
        }

        self.surface.capture_pointer(event.pointer_id);

        self.frame = self.surface.origin();
        let local = self.local_point(event);
        self.state.pointer_identifier = Some(event.pointer_id);
        self.state.begin_gesture(local.x, local.y);
        self.state.is_pressed = true;
        self.state.is_active = if self.config.spring {
            true
        } else {
            !self.state.is_active
        };

        if !self.config.fixed {
            self.surface.move_anchor(local);
        }

        self.refresh_highlight();
        self.strategy
            .on_start(&mut self.state, &self.config, self.surface.as_mut());

        debug!(
            "'{}' pressed by {} at ({}, {})",
            self.config.id, event.pointer_id, local.x, local.y
        );
        self.notify();
        true
    }

    /// Drag. Only the pointer that pressed the controller moves it.
    pub fn handle_move(&mut self, event: &PointerEvent) -> bool {
        if !self.state.is_initialized
            || !self.state.is_pressed
            || !self.state.owns(event.pointer_id)
            || !self.strategy.tracks_drag()
        {
            return false;
        }
        if !event.position.is_finite() {
            trace!("'{}' ignoring move to non-finite position", self.config.id);
            return false;
        }

        let local = self.local_point(event);
        let state = &mut self.state;
        state.is_drag = true;
        state.x_drag = local.x;
        state.y_drag = local.y;
        state.x_diff = state.x_drag - state.x_start;
        state.y_diff = state.y_drag - state.y_start;
        state.drag_distance = self
            .config
            .radius
            .min(distance(state.x_diff, state.y_diff));
        state.angle = normalize_angle(state.y_diff.atan2(state.x_diff));

        self.strategy
            .on_move(&mut self.state, &self.config, self.surface.as_mut());

        trace!(
            "'{}' dragged to distance {:.2}, angle {:.3}, value {:.3}",
            self.config.id,
            self.state.drag_distance,
            self.state.angle,
            self.state.value
        );
        self.notify();
        true
    }

    /// Release. Only the owning pointer can release the controller.
    pub fn handle_end(&mut self, event: &PointerEvent) -> bool {
        if !self.state.is_initialized || !self.state.owns(event.pointer_id) {
            return false;
        }

        self.surface.release_pointer(event.pointer_id);

        self.state.pointer_identifier = None;
        self.state.is_drag = false;
        self.state.is_pressed = false;
        if self.config.spring {
            self.state.is_active = false;
        }

        self.refresh_highlight();
        self.strategy
            .on_end(&mut self.state, &self.config, self.surface.as_mut());

        debug!("'{}' released by {}", self.config.id, event.pointer_id);
        self.notify();
        true
    }

    /// Pointer lost without a release, handled as a release
    pub fn handle_cancel(&mut self, event: &PointerEvent) -> bool {
        self.handle_end(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::surface::HeadlessSurface;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted(options: ControllerOptions) -> (Controller, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let options = options.on_input(move |_| counter.set(counter.get() + 1));
        let mut controller = Controller::new(options, Box::new(HeadlessSurface::default())).unwrap();
        controller.init();
        (controller, calls)
    }

    #[test]
    fn test_missing_id_fails_fast() {
        let err = Controller::new(ControllerOptions::default(), Box::new(HeadlessSurface::default())).unwrap_err();
        assert_eq!(err, ControllerError::MissingId);
    }

    #[test]
    fn test_phases() {
        let (mut controller, _) = counted(ControllerOptions::joystick("j"));
        assert_eq!(controller.phase(), GesturePhase::Idle);

        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        assert_eq!(controller.phase(), GesturePhase::Pressed);

        controller.handle_move(&PointerEvent::new(1, 5.0, 0.0));
        assert_eq!(controller.phase(), GesturePhase::Dragging);

        controller.handle_end(&PointerEvent::new(1, 5.0, 0.0));
        assert_eq!(controller.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_unknown_pointer_is_ignored() {
        let (mut controller, calls) = counted(ControllerOptions::joystick("j"));
        let before = controller.state().clone();

        assert!(!controller.handle_move(&PointerEvent::new(9, 50.0, 50.0)));
        assert!(!controller.handle_end(&PointerEvent::new(9, 50.0, 50.0)));

        assert_eq!(controller.state(), &before);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_foreign_pointer_cannot_move_or_release() {
        let (mut controller, calls) = counted(ControllerOptions::joystick("j"));

        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        assert!(!controller.handle_move(&PointerEvent::new(2, 30.0, 0.0)));
        assert!(!controller.handle_end(&PointerEvent::new(2, 30.0, 0.0)));

        assert!(controller.state().is_pressed);
        assert_eq!(controller.state().value, 0.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_non_finite_positions_are_ignored() {
        let (mut controller, calls) = counted(ControllerOptions::joystick("j"));

        assert!(!controller.handle_start(&PointerEvent::new(1, f64::NAN, 0.0)));
        assert_eq!(controller.phase(), GesturePhase::Idle);

        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        let before = controller.state().clone();
        assert!(!controller.handle_move(&PointerEvent::new(1, f64::NAN, 0.0)));
        assert!(!controller.handle_move(&PointerEvent::new(1, 0.0, f64::INFINITY)));

        assert_eq!(controller.state(), &before);
        assert_eq!(controller.state().axis_x, 0.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_cancel_behaves_like_release() {
        let (mut controller, calls) = counted(ControllerOptions::joystick("j"));

        controller.handle_start(&PointerEvent::new(4, 0.0, 0.0));
        controller.handle_move(&PointerEvent::new(4, 0.0, 20.0));
        assert!(controller.handle_cancel(&PointerEvent::new(4, 0.0, 20.0)));

        assert_eq!(controller.phase(), GesturePhase::Idle);
        assert_eq!(controller.state().value, 0.0);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_coordinates_are_relative_to_surface() {
        let surface = HeadlessSurface::new(Point::new(200.0, 300.0));
        let mut controller = Controller::new(ControllerOptions::joystick("j"), Box::new(surface)).unwrap();
        controller.init();

        controller.handle_start(&PointerEvent::new(1, 210.0, 320.0));
        assert_eq!((controller.state().x_start, controller.state().y_start), (10.0, 20.0));

        controller.handle_move(&PointerEvent::new(1, 215.0, 320.0));
        assert_eq!((controller.state().x_diff, controller.state().y_diff), (5.0, 0.0));
    }

    #[test]
    fn test_unfixed_controller_moves_anchor() {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        let mut controller =
            Controller::new(ControllerOptions::joystick("j").fixed(false), Box::new(surface)).unwrap();
        controller.init();

        controller.handle_start(&PointerEvent::new(1, 42.0, 24.0));
        assert_eq!(probe.view().anchor, Some(Point::new(42.0, 24.0)));
    }

    /// Surface that relocates its box, and so its origin, to the anchor
    struct FollowingSurface {
        origin: Point,
    }

    impl Surface for FollowingSurface {
        fn mount(&mut self, _config: &ControllerConfig) {}
        fn unmount(&mut self) {}
        fn origin(&self) -> Point {
            self.origin
        }
        fn set_active(&mut self, _active: bool) {}
        fn move_anchor(&mut self, to: Point) {
            self.origin = Point::new(self.origin.x + to.x, self.origin.y + to.y);
        }
        fn move_knob(&mut self, _knob: crate::controller::surface::KnobPosition) {}
    }

    #[test]
    fn test_moving_anchor_does_not_shift_gesture_frame() {
        let surface = FollowingSurface {
            origin: Point::new(10.0, 10.0),
        };
        let mut controller =
            Controller::new(ControllerOptions::joystick("j").fixed(false), Box::new(surface)).unwrap();
        controller.init();

        controller.handle_start(&PointerEvent::new(1, 110.0, 110.0));
        controller.handle_move(&PointerEvent::new(1, 130.0, 110.0));
        let state = controller.state();
        assert_eq!((state.x_start, state.y_start), (100.0, 100.0));
        assert_eq!((state.x_diff, state.y_diff), (20.0, 0.0));
        assert_eq!(state.value, 0.5);
        controller.handle_end(&PointerEvent::new(1, 130.0, 110.0));

        // the next press picks up the relocated box
        controller.handle_start(&PointerEvent::new(2, 120.0, 110.0));
        assert_eq!((controller.state().x_start, controller.state().y_start), (10.0, 0.0));
    }

    #[test]
    fn test_fixed_controller_keeps_anchor() {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        let mut controller = Controller::new(ControllerOptions::joystick("j"), Box::new(surface)).unwrap();
        controller.init();

        controller.handle_start(&PointerEvent::new(1, 42.0, 24.0));
        assert_eq!(probe.view().anchor, None);
    }

    #[test]
    fn test_pointer_capture_follows_gesture() {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        let mut controller = Controller::new(ControllerOptions::button("b"), Box::new(surface)).unwrap();
        controller.init();

        controller.handle_start(&PointerEvent::new(6, 0.0, 0.0));
        assert_eq!(probe.view().captured, Some(crate::controller::state::PointerId(6)));
        controller.handle_end(&PointerEvent::new(6, 0.0, 0.0));
        assert_eq!(probe.view().captured, None);
    }

    #[test]
    fn test_destroy_is_idempotent_and_stops_events() {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        let (mut controller, calls) = {
            let calls = Rc::new(Cell::new(0));
            let counter = Rc::clone(&calls);
            let options = ControllerOptions::button("b").on_input(move |_| counter.set(counter.get() + 1));
            (Controller::new(options, Box::new(surface)).unwrap(), calls)
        };

        assert!(!controller.handle_start(&PointerEvent::new(1, 0.0, 0.0)));
        controller.init();
        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));

        controller.destroy();
        controller.destroy();
        assert!(!controller.is_initialized());
        assert!(!probe.view().mounted);
        assert_eq!(probe.view().captured, None);

        assert!(!controller.handle_end(&PointerEvent::new(1, 0.0, 0.0)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reinit_resets_state() {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        let mut controller =
            Controller::new(ControllerOptions::button("b").spring(false), Box::new(surface)).unwrap();
        controller.init();
        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        assert!(controller.state().is_active);

        controller.init();
        assert!(!controller.state().is_active);
        assert_eq!(controller.state().pointer_identifier, None);
        assert_eq!(probe.view().mount_count, 2);
        assert!(probe.view().mounted);
    }

    #[test]
    fn test_isolated_controllers_do_not_cross_mutate() {
        let (mut left, _) = counted(ControllerOptions::joystick("left"));
        let (mut right, _) = counted(ControllerOptions::joystick("right"));

        left.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        right.handle_start(&PointerEvent::new(2, 0.0, 0.0));

        for controller in [&mut left, &mut right] {
            controller.handle_move(&PointerEvent::new(1, 20.0, 0.0));
            controller.handle_move(&PointerEvent::new(2, 0.0, -10.0));
        }

        assert_eq!((left.state().x_diff, left.state().y_diff), (20.0, 0.0));
        assert_eq!((right.state().x_diff, right.state().y_diff), (0.0, -10.0));

        for controller in [&mut left, &mut right] {
            controller.handle_end(&PointerEvent::new(1, 0.0, 0.0));
        }
        assert_eq!(left.phase(), GesturePhase::Idle);
        assert_eq!(right.phase(), GesturePhase::Dragging);
    }
}
