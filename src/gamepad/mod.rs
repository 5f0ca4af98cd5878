//! Gamepad registry
//!
//! Owns a set of controllers keyed by id, routes pointer events to them and
//! aggregates their state into a [`GamepadSnapshot`].
//!
//! # Id policy
//!
//! Ids are unique. Registering an id that is already taken fails with
//! [`GamepadError::DuplicateId`]; the registered controller keeps running and
//! the rejected one is never initialized.

pub mod error;
pub mod host;
pub mod snapshot;

pub use error::GamepadError;
pub use host::{HeadlessHost, Host, VibrationPattern};
pub use snapshot::{ButtonSnapshot, GamepadSnapshot};

use crate::controller::{
    Controller, ControllerConfig, ControllerKind, ControllerOptions, HeadlessSurfaceFactory, PointerEvent,
    SurfaceFactory,
};
use chrono::Local;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, trace, warn};

pub const SNAPSHOT_ID: &str = "Virtual Gamepad";
pub const SNAPSHOT_MAPPING: &str = "standard";

pub struct Gamepad<H: Host = HeadlessHost> {
    controllers: HashMap<String, Controller>,
    /// Registration order, the source of snapshot indices
    order: Vec<String>,
    host: H,
    surfaces: Box<dyn SurfaceFactory>,
    fullscreen_on_click: bool,
}

impl<H: Host> fmt::Debug for Gamepad<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gamepad")
            .field("controllers", &self.controllers)
            .field("order", &self.order)
            .field("fullscreen_on_click", &self.fullscreen_on_click)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Gamepad<H> {
    /// Creates an empty gamepad whose option-built controllers render on
    /// headless surfaces
    pub fn new(host: H) -> Self {
        Self::with_surface_factory(host, HeadlessSurfaceFactory)
    }

    pub fn with_surface_factory(host: H, surfaces: impl SurfaceFactory + 'static) -> Self {
        Self {
            controllers: HashMap::new(),
            order: Vec::new(),
            host,
            surfaces: Box::new(surfaces),
            fullscreen_on_click: false,
        }
    }

    /// Registers and initializes a pre-built controller
    pub fn add(&mut self, mut controller: Controller) -> Result<&mut Self, GamepadError> {
        let id = controller.id().to_string();
        if self.controllers.contains_key(&id) {
            warn!("Rejecting controller with duplicate id '{}'", id);
            return Err(GamepadError::DuplicateId(id));
        }

        controller.init();
        info!("Added {} controller '{}'", controller.kind(), id);
        self.order.push(id.clone());
        self.controllers.insert(id, controller);
        Ok(self)
    }

    /// Builds a controller from options, dispatching on its `type`, and
    /// registers it
    pub fn add_options(&mut self, options: ControllerOptions) -> Result<&mut Self, GamepadError> {
        let (config, on_input) = ControllerConfig::resolve(options)?;
        if self.controllers.contains_key(&config.id) {
            warn!("Rejecting options with duplicate id '{}'", config.id);
            return Err(GamepadError::DuplicateId(config.id));
        }

        let surface = self.surfaces.create(&config);
        self.add(Controller::from_config(config, on_input, surface))
    }

    /// Registers several option sets, stopping at the first failure
    pub fn add_all(
        &mut self,
        options: impl IntoIterator<Item = ControllerOptions>,
    ) -> Result<&mut Self, GamepadError> {
        for entry in options {
            self.add_options(entry)?;
        }
        Ok(self)
    }

    /// Destroys and unregisters one controller. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.controllers.remove(id) {
            Some(mut controller) => {
                controller.destroy();
                self.order.retain(|registered| registered != id);
                info!("Removed controller '{}'", id);
                true
            }
            None => {
                debug!("Nothing to remove for '{}'", id);
                false
            }
        }
    }

    /// Destroys one controller, or all of them when `id` is `None`
    pub fn destroy(&mut self, id: Option<&str>) -> &mut Self {
        match id {
            Some(id) => {
                self.remove(id);
            }
            None => self.destroy_all(),
        }
        self
    }

    /// Destroys every controller and drops the fullscreen-on-click binding
    pub fn destroy_all(&mut self) {
        for id in std::mem::take(&mut self.order) {
            if let Some(mut controller) = self.controllers.remove(&id) {
                controller.destroy();
            }
        }
        self.fullscreen_on_click = false;
        info!("Destroyed all controllers");
    }

    pub fn controller(&self, id: &str) -> Option<&Controller> {
        self.controllers.get(id)
    }

    pub fn controller_mut(&mut self, id: &str) -> Option<&mut Controller> {
        self.controllers.get_mut(id)
    }

    /// Ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Controllers in registration order
    pub fn controllers(&self) -> impl Iterator<Item = &Controller> {
        self.order.iter().filter_map(|id| self.controllers.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Routes a press to the controller it landed on
    pub fn pointer_down(&mut self, id: &str, event: &PointerEvent) -> Result<bool, GamepadError> {
        let controller = self
            .controllers
            .get_mut(id)
            .ok_or_else(|| GamepadError::UnknownController(id.to_string()))?;
        Ok(controller.handle_start(event))
    }

    /// Broadcasts a move; only the owner of the pointer reacts.
    /// Returns how many controllers took the event.
    pub fn pointer_move(&mut self, event: &PointerEvent) -> usize {
        self.broadcast(event, Controller::handle_move)
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> usize {
        self.broadcast(event, Controller::handle_end)
    }

    pub fn pointer_cancel(&mut self, event: &PointerEvent) -> usize {
        self.broadcast(event, Controller::handle_cancel)
    }

    /// Offers the event to every controller in registration order
    fn broadcast(&mut self, event: &PointerEvent, handler: fn(&mut Controller, &PointerEvent) -> bool) -> usize {
        let mut handled = 0;
        for id in &self.order {
            if let Some(controller) = self.controllers.get_mut(id) {
                if handler(controller, event) {
                    handled += 1;
                }
            }
        }
        if handled == 0 {
            trace!("No controller owns pointer {}", event.pointer_id);
        }
        handled
    }

    pub fn is_vibration_supported(&self) -> bool {
        self.host.supports_vibration()
    }

    /// Best-effort vibration, silently skipped when the host has no haptics
    pub fn vibrate(&mut self, pattern: impl Into<VibrationPattern>) -> &mut Self {
        let pattern = pattern.into();
        if self.host.supports_vibration() {
            self.host.vibrate(&pattern);
        } else {
            debug!("Vibration not supported, skipping {:?}", pattern);
        }
        self
    }

    /// Enters fullscreen on the next click on the gamepad area
    pub fn request_full_screen(&mut self) -> &mut Self {
        self.fullscreen_on_click = true;
        self
    }

    pub fn is_fullscreen_on_click(&self) -> bool {
        self.fullscreen_on_click
    }

    /// Click on the gamepad area, as reported by the host
    pub fn handle_click(&mut self) {
        if self.fullscreen_on_click && !self.host.is_fullscreen() {
            self.host.request_fullscreen();
        }
    }

    pub fn exit_full_screen(&mut self) -> &mut Self {
        if self.host.is_fullscreen() {
            self.host.exit_fullscreen();
        }
        self
    }

    /// Aggregates all controllers into a standard-gamepad shaped report
    pub fn snapshot(&self) -> GamepadSnapshot {
        let mut buttons = Vec::new();
        let mut axes = Vec::new();

        for controller in self.controllers() {
            let state = controller.state();
            match controller.kind() {
                ControllerKind::Button => buttons.push(ButtonSnapshot {
                    pressed: state.value > 0.0,
                    touched: state.is_pressed,
                    value: state.value,
                }),
                ControllerKind::Joystick | ControllerKind::DPad => {
                    axes.push(state.axis_x);
                    axes.push(state.axis_y);
                }
            }
        }

        GamepadSnapshot {
            id: SNAPSHOT_ID.to_string(),
            connected: !self.order.is_empty(),
            mapping: SNAPSHOT_MAPPING.to_string(),
            timestamp: Local::now(),
            axes,
            buttons,
        }
    }
}

impl<H: Host> Drop for Gamepad<H> {
    fn drop(&mut self) {
        if !self.order.is_empty() {
            self.destroy_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{HeadlessSurface, Point, Surface, SurfaceProbe};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gamepad() -> Gamepad {
        Gamepad::new(HeadlessHost::new(true))
    }

    fn built(options: ControllerOptions) -> (Controller, SurfaceProbe) {
        let surface = HeadlessSurface::default();
        let probe = surface.probe();
        (Controller::new(options, Box::new(surface)).unwrap(), probe)
    }

    #[test]
    fn test_add_initializes() {
        let mut pad = gamepad();
        let (controller, probe) = built(ControllerOptions::button("a"));

        pad.add(controller).unwrap();
        assert!(probe.view().mounted);
        assert!(pad.controller("a").unwrap().is_initialized());
        assert_eq!(pad.len(), 1);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut pad = gamepad();
        let (first, first_probe) = built(ControllerOptions::button("a"));
        let (second, second_probe) = built(ControllerOptions::joystick("a"));

        pad.add(first).unwrap();
        let err = pad.add(second).unwrap_err();

        assert_eq!(err, GamepadError::DuplicateId("a".into()));
        assert_eq!(pad.controller("a").unwrap().kind(), ControllerKind::Button);
        assert!(first_probe.view().mounted);
        assert_eq!(second_probe.view().mount_count, 0);

        let err = pad.add_options(ControllerOptions::dpad(" a ")).unwrap_err();
        assert_eq!(err, GamepadError::DuplicateId("a".into()));
        assert_eq!(pad.len(), 1);
    }

    #[test]
    fn test_add_options_dispatches_on_type() {
        let mut pad = gamepad();
        pad.add_all([
            ControllerOptions::joystick("stick"),
            ControllerOptions::button("fire"),
            ControllerOptions::dpad("pad"),
        ])
        .unwrap();

        let kinds: Vec<_> = pad.controllers().map(Controller::kind).collect();
        assert_eq!(
            kinds,
            vec![ControllerKind::Joystick, ControllerKind::Button, ControllerKind::DPad]
        );
    }

    #[test]
    fn test_add_options_without_id_fails() {
        let mut pad = gamepad();
        let err = pad.add_options(ControllerOptions::default()).unwrap_err();
        assert_eq!(err, GamepadError::Controller(crate::controller::ControllerError::MissingId));
        assert!(pad.is_empty());
    }

    #[test]
    fn test_surface_factory_is_used() {
        let probes: Rc<RefCell<Vec<SurfaceProbe>>> = Rc::default();
        let sink = Rc::clone(&probes);
        let factory = move |_config: &ControllerConfig| -> Box<dyn Surface> {
            let surface = HeadlessSurface::new(Point::new(100.0, 0.0));
            sink.borrow_mut().push(surface.probe());
            Box::new(surface)
        };

        let mut pad = Gamepad::with_surface_factory(HeadlessHost::default(), factory);
        pad.add_options(ControllerOptions::joystick("j")).unwrap();

        assert_eq!(probes.borrow().len(), 1);
        assert!(probes.borrow()[0].view().mounted);

        pad.pointer_down("j", &PointerEvent::new(1, 110.0, 5.0)).unwrap();
        assert_eq!(pad.controller("j").unwrap().state().x_start, 10.0);
    }

    #[test]
    fn test_remove_and_unknown_ids() {
        let mut pad = gamepad();
        let (controller, probe) = built(ControllerOptions::button("a"));
        pad.add(controller).unwrap();

        assert!(!pad.remove("missing"));
        assert!(pad.remove("a"));
        assert!(!pad.remove("a"));
        assert!(!probe.view().mounted);
        assert!(pad.is_empty());

        pad.destroy(Some("missing"));
    }

    #[test]
    fn test_destroy_all_releases_everything() {
        let mut pad = gamepad();
        let (a, a_probe) = built(ControllerOptions::button("a"));
        let (b, b_probe) = built(ControllerOptions::joystick("b"));
        pad.add(a).unwrap().add(b).unwrap();
        pad.request_full_screen();

        pad.destroy(None);

        assert!(pad.is_empty());
        assert!(!a_probe.view().mounted);
        assert!(!b_probe.view().mounted);
        assert!(!pad.is_fullscreen_on_click());

        pad.handle_click();
        assert_eq!(pad.host().fullscreen_requests, 0);
    }

    #[test]
    fn test_snapshot_follows_registration_order() {
        let mut pad = gamepad();
        pad.add_all([
            ControllerOptions::joystick("A").radius(10.0),
            ControllerOptions::button("buttonA"),
            ControllerOptions::joystick("B").radius(10.0),
        ])
        .unwrap();

        pad.pointer_down("A", &PointerEvent::new(1, 0.0, 0.0)).unwrap();
        pad.pointer_move(&PointerEvent::new(1, 5.0, 0.0));
        pad.pointer_down("B", &PointerEvent::new(2, 0.0, 0.0)).unwrap();
        pad.pointer_move(&PointerEvent::new(2, 0.0, -10.0));
        pad.pointer_down("buttonA", &PointerEvent::new(3, 0.0, 0.0)).unwrap();

        let snapshot = pad.snapshot();
        assert_eq!(snapshot.axes.len(), 4);
        assert!((snapshot.axes[0] - 0.5).abs() < 1e-9);
        assert!(snapshot.axes[1].abs() < 1e-9);
        assert!(snapshot.axes[2].abs() < 1e-9);
        assert!((snapshot.axes[3] + 1.0).abs() < 1e-9);
        assert_eq!(
            snapshot.buttons,
            vec![ButtonSnapshot {
                pressed: true,
                touched: true,
                value: 1.0
            }]
        );

        // stable across calls
        let again = pad.snapshot();
        assert_eq!(again.axes, snapshot.axes);
        assert_eq!(again.buttons, snapshot.buttons);
        assert!(again.connected);
        assert_eq!(again.mapping, SNAPSHOT_MAPPING);
    }

    #[test]
    fn test_snapshot_after_remove_shifts_indices() {
        let mut pad = gamepad();
        pad.add_all([
            ControllerOptions::button("x"),
            ControllerOptions::button("y").spring(false),
        ])
        .unwrap();
        pad.pointer_down("y", &PointerEvent::new(1, 0.0, 0.0)).unwrap();
        pad.pointer_up(&PointerEvent::new(1, 0.0, 0.0));

        assert!(pad.snapshot().buttons[1].pressed);
        pad.remove("x");
        let snapshot = pad.snapshot();
        assert_eq!(snapshot.buttons.len(), 1);
        assert!(snapshot.buttons[0].pressed);
        assert!(!snapshot.buttons[0].touched);
    }

    #[test]
    fn test_pointer_down_unknown_target() {
        let mut pad = gamepad();
        let err = pad.pointer_down("ghost", &PointerEvent::new(1, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, GamepadError::UnknownController("ghost".into()));
    }

    #[test]
    fn test_moves_route_by_pointer() {
        let mut pad = gamepad();
        pad.add_all([ControllerOptions::joystick("l"), ControllerOptions::joystick("r")])
            .unwrap();

        pad.pointer_down("l", &PointerEvent::new(1, 0.0, 0.0)).unwrap();
        pad.pointer_down("r", &PointerEvent::new(2, 0.0, 0.0)).unwrap();

        assert_eq!(pad.pointer_move(&PointerEvent::new(2, 10.0, 0.0)), 1);
        assert_eq!(pad.pointer_move(&PointerEvent::new(99, 10.0, 0.0)), 0);
        assert_eq!(pad.controller("l").unwrap().state().x_diff, 0.0);
        assert_eq!(pad.controller("r").unwrap().state().x_diff, 10.0);

        assert_eq!(pad.pointer_cancel(&PointerEvent::new(1, 0.0, 0.0)), 1);
        assert!(!pad.controller("l").unwrap().state().is_pressed);
        assert!(pad.controller("r").unwrap().state().is_pressed);
    }

    #[test]
    fn test_shared_pointer_notifies_in_registration_order() {
        let log: Rc<RefCell<Vec<String>>> = Rc::default();
        let ids = ["zeta", "alpha", "mid", "omega", "beta", "kappa", "delta", "gamma"];
        let mut pad = gamepad();
        for id in ids {
            let seen = Rc::clone(&log);
            let name = id.to_string();
            pad.add_options(
                ControllerOptions::joystick(id).on_input(move |_| seen.borrow_mut().push(name.clone())),
            )
            .unwrap();
            pad.pointer_down(id, &PointerEvent::new(1, 0.0, 0.0)).unwrap();
        }
        log.borrow_mut().clear();

        assert_eq!(pad.pointer_move(&PointerEvent::new(1, 10.0, 0.0)), ids.len());
        assert_eq!(pad.pointer_up(&PointerEvent::new(1, 10.0, 0.0)), ids.len());

        let expected: Vec<String> = ids.iter().chain(ids.iter()).map(|id| id.to_string()).collect();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_vibrate_passthrough() {
        let mut pad = gamepad();
        pad.vibrate(200u32).vibrate(vec![200u32, 30, 100]);
        assert_eq!(
            pad.host().vibrations,
            vec![VibrationPattern::Single(200), VibrationPattern::Sequence(vec![200, 30, 100])]
        );
    }

    #[test]
    fn test_vibrate_without_support_is_noop() {
        let mut pad = Gamepad::new(HeadlessHost::new(false));
        assert!(!pad.is_vibration_supported());
        pad.vibrate(100u32);
        assert!(pad.host().vibrations.is_empty());
    }

    #[test]
    fn test_fullscreen_on_click() {
        let mut pad = gamepad();

        pad.handle_click();
        assert_eq!(pad.host().fullscreen_requests, 0);

        pad.request_full_screen();
        pad.handle_click();
        pad.handle_click();
        assert_eq!(pad.host().fullscreen_requests, 1);
        assert!(pad.host().is_fullscreen());

        pad.exit_full_screen();
        assert!(!pad.host().is_fullscreen());
    }
}
