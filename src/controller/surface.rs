//! Rendering surface abstraction.
//!
//! A controller never touches a concrete UI toolkit. Everything visual goes
//! through [`Surface`], which the host application implements for its
//! renderer (DOM, egui, a game engine overlay). [`HeadlessSurface`] is the
//! built-in implementation: it keeps the would-be visual state in memory and
//! traces every call, which is what the replay tool and the tests use.

use crate::controller::config::ControllerConfig;
use crate::controller::event::Point;
use crate::controller::state::PointerId;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Where the joystick knob should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KnobPosition {
    #[default]
    Center,
    /// Pixels from the top-left corner of the controller box
    At(Point),
}

/// Visual side of one controller, owned exclusively by it from `init` to
/// `destroy`
pub trait Surface {
    /// Creates the visual element and binds its input events
    fn mount(&mut self, config: &ControllerConfig);

    /// Removes the element and drops all event bindings
    fn unmount(&mut self);

    /// Top-left corner of the controller box in client coordinates. Read
    /// once per press; moving the anchor mid-gesture does not shift the
    /// frame the drag is measured in.
    fn origin(&self) -> Point;

    /// Toggles the "is-active" look
    fn set_active(&mut self, active: bool);

    /// Relocates the controller anchor, used when the controller is not fixed
    fn move_anchor(&mut self, to: Point);

    fn move_knob(&mut self, knob: KnobPosition);

    fn capture_pointer(&mut self, _pointer: PointerId) {}

    fn release_pointer(&mut self, _pointer: PointerId) {}
}

/// Builds surfaces for controllers created from options
pub trait SurfaceFactory {
    fn create(&mut self, config: &ControllerConfig) -> Box<dyn Surface>;
}

impl<F> SurfaceFactory for F
where
    F: FnMut(&ControllerConfig) -> Box<dyn Surface>,
{
    fn create(&mut self, config: &ControllerConfig) -> Box<dyn Surface> {
        self(config)
    }
}

/// In-memory record of what a headless surface would show
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceView {
    pub id: String,
    pub mounted: bool,
    pub mount_count: usize,
    pub active: bool,
    pub anchor: Option<Point>,
    pub knob: KnobPosition,
    pub captured: Option<PointerId>,
}

/// Read handle on a [`HeadlessSurface`] that stays valid after the surface
/// has been moved into its controller
#[derive(Debug, Clone)]
pub struct SurfaceProbe(Rc<RefCell<SurfaceView>>);

impl SurfaceProbe {
    pub fn view(&self) -> SurfaceView {
        self.0.borrow().clone()
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    origin: Point,
    view: Rc<RefCell<SurfaceView>>,
}

impl HeadlessSurface {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            view: Rc::new(RefCell::new(SurfaceView::default())),
        }
    }

    pub fn probe(&self) -> SurfaceProbe {
        SurfaceProbe(Rc::clone(&self.view))
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new(Point::ORIGIN)
    }
}

impl Surface for HeadlessSurface {
    fn mount(&mut self, config: &ControllerConfig) {
        debug!(
            "Mounting {} '{}' (radius {}, axis {})",
            config.kind, config.id, config.radius, config.axis
        );
        let mut view = self.view.borrow_mut();
        view.id = config.id.clone();
        view.mounted = true;
        view.mount_count += 1;
        view.active = false;
        view.anchor = None;
        view.knob = KnobPosition::Center;
    }

    fn unmount(&mut self) {
        let mut view = self.view.borrow_mut();
        debug!("Unmounting '{}'", view.id);
        view.mounted = false;
        view.captured = None;
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn set_active(&mut self, active: bool) {
        self.view.borrow_mut().active = active;
    }

    fn move_anchor(&mut self, to: Point) {
        trace!("Anchor moved to ({}, {})", to.x, to.y);
        self.view.borrow_mut().anchor = Some(to);
    }

    fn move_knob(&mut self, knob: KnobPosition) {
        trace!("Knob moved to {:?}", knob);
        self.view.borrow_mut().knob = knob;
    }

    fn capture_pointer(&mut self, pointer: PointerId) {
        self.view.borrow_mut().captured = Some(pointer);
    }

    fn release_pointer(&mut self, pointer: PointerId) {
        let mut view = self.view.borrow_mut();
        if view.captured == Some(pointer) {
            view.captured = None;
        }
    }
}

/// Factory producing [`HeadlessSurface`]s at the client origin
#[derive(Debug, Default)]
pub struct HeadlessSurfaceFactory;

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&mut self, _config: &ControllerConfig) -> Box<dyn Surface> {
        Box::new(HeadlessSurface::default())
    }
}
