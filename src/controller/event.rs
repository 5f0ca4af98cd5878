use crate::controller::state::PointerId;
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A point in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

/// One pointer event as delivered by the platform.
///
/// `position` is in client (viewport) coordinates; the controller converts it
/// into its own frame using the surface origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub position: Point,
    /// The contact landed on a button region
    #[serde(default)]
    pub over_button: bool,
}

impl PointerEvent {
    pub fn new(pointer_id: i64, x: f64, y: f64) -> Self {
        Self {
            pointer_id: PointerId(pointer_id),
            position: Point::new(x, y),
            over_button: false,
        }
    }

    pub fn over_button(mut self) -> Self {
        self.over_button = true;
        self
    }
}
