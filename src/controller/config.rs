//! Controller options and their resolution into an immutable configuration.
//!
//! Building a [`ControllerConfig`] happens in three explicit stages:
//!
//! 1. [`ControllerConfig::defaults`] - per-variant defaults
//! 2. user overrides from [`ControllerOptions`], field by field
//! 3. computed fields (validated radius, d-pad sectors, final style map)

use crate::controller::error::ControllerError;
use crate::controller::state::ControllerState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_RADIUS: f64 = 40.0;
pub const DEFAULT_DIRECTIONS: usize = 4;

/// Kind of control, fixed for the lifetime of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    #[default]
    Button,
    Joystick,
    #[serde(alias = "d-pad")]
    DPad,
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerKind::Button => write!(f, "button"),
            ControllerKind::Joystick => write!(f, "joystick"),
            ControllerKind::DPad => write!(f, "dpad"),
        }
    }
}

/// Which spatial component(s) of a drag produce output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    All,
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::All => write!(f, "all"),
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Anchor position of a control, in CSS-like length strings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
}

impl Position {
    pub fn centered() -> Self {
        Self {
            top: Some("50%".to_string()),
            left: Some("50%".to_string()),
            right: None,
            bottom: None,
        }
    }
}

/// Style properties handed verbatim to the rendering surface
pub type Style = BTreeMap<String, String>;

/// Callback invoked with the controller state after every accepted event
pub struct InputCallback(Box<dyn FnMut(&ControllerState)>);

impl InputCallback {
    pub fn new(callback: impl FnMut(&ControllerState) + 'static) -> Self {
        Self(Box::new(callback))
    }

    pub fn call(&mut self, state: &ControllerState) {
        (self.0)(state)
    }
}

impl fmt::Debug for InputCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputCallback")
    }
}

/// User-facing options, as written in a layout file or built in code.
///
/// Every field is optional; missing ones fall back to the variant defaults.
/// A missing `id` is an error at construction time.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ControllerOptions {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ControllerKind>,
    pub radius: Option<f64>,
    pub axis: Option<Axis>,
    pub spring: Option<bool>,
    pub fixed: Option<bool>,
    pub text: Option<String>,
    pub position: Option<Position>,
    pub style: Option<Style>,
    pub directions: Option<usize>,
    #[serde(skip)]
    pub on_input: Option<InputCallback>,
}

impl ControllerOptions {
    pub fn new(id: impl Into<String>, kind: ControllerKind) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn button(id: impl Into<String>) -> Self {
        Self::new(id, ControllerKind::Button)
    }

    pub fn joystick(id: impl Into<String>) -> Self {
        Self::new(id, ControllerKind::Joystick)
    }

    pub fn dpad(id: impl Into<String>) -> Self {
        Self::new(id, ControllerKind::DPad)
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn spring(mut self, spring: bool) -> Self {
        self.spring = Some(spring);
        self
    }

    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style
            .get_or_insert_with(Style::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn directions(mut self, directions: usize) -> Self {
        self.directions = Some(directions);
        self
    }

    pub fn on_input(mut self, callback: impl FnMut(&ControllerState) + 'static) -> Self {
        self.on_input = Some(InputCallback::new(callback));
        self
    }
}

/// Resolved, immutable configuration of one controller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerConfig {
    pub id: String,
    pub kind: ControllerKind,
    pub radius: f64,
    pub axis: Axis,
    pub spring: bool,
    pub fixed: bool,
    pub text: String,
    pub position: Position,
    pub style: Style,
    pub directions: usize,
}

impl ControllerConfig {
    /// Stage one: defaults for a variant, with an empty id
    pub fn defaults(kind: ControllerKind) -> Self {
        Self {
            id: String::new(),
            kind,
            radius: DEFAULT_RADIUS,
            axis: Axis::All,
            spring: true,
            fixed: true,
            text: String::new(),
            position: Position::centered(),
            style: Style::new(),
            directions: DEFAULT_DIRECTIONS,
        }
    }

    /// Runs all three stages. The callback is split off and returned
    /// separately since it is not part of the immutable config.
    pub fn resolve(
        mut options: ControllerOptions,
    ) -> Result<(Self, Option<InputCallback>), ControllerError> {
        let on_input = options.on_input.take();
        let kind = options.kind.unwrap_or_default();

        let mut config = Self::defaults(kind);
        let user_style = config.apply(options)?;
        config.compute(user_style)?;

        Ok((config, on_input))
    }

    /// Stage two: user overrides. Returns the user style so stage three can
    /// layer it on top of the computed styles.
    fn apply(&mut self, options: ControllerOptions) -> Result<Style, ControllerError> {
        let id = options
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or(ControllerError::MissingId)?;
        self.id = id;

        if let Some(radius) = options.radius {
            self.radius = radius;
        }
        if let Some(axis) = options.axis {
            self.axis = axis;
        }
        if let Some(spring) = options.spring {
            self.spring = spring;
        }
        if let Some(fixed) = options.fixed {
            self.fixed = fixed;
        }
        if let Some(text) = options.text {
            self.text = text;
        }
        if let Some(position) = options.position {
            self.position = position;
        }
        if let Some(directions) = options.directions {
            self.directions = directions;
        }

        Ok(options.style.unwrap_or_default())
    }

    /// Stage three: validation and derived presentation styles
    fn compute(&mut self, user_style: Style) -> Result<(), ControllerError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ControllerError::InvalidRadius {
                id: self.id.clone(),
                radius: self.radius,
            });
        }
        if self.kind == ControllerKind::DPad && self.directions < 2 {
            return Err(ControllerError::InvalidDirections {
                id: self.id.clone(),
                directions: self.directions,
            });
        }

        let diameter = self.radius * 2.0;
        let mut style = Style::new();
        style.insert("box-sizing".into(), "content-box".into());
        style.insert("position".into(), "absolute".into());
        style.insert("transform".into(), "translate(-50%, -50%)".into());
        style.insert("font-size".into(), format!("{}px", self.radius));
        style.insert("border-radius".into(), format!("{diameter}px"));
        style.insert("user-select".into(), "none".into());

        match self.axis {
            Axis::All => {
                style.insert("min-width".into(), format!("{diameter}px"));
                style.insert("height".into(), format!("{diameter}px"));
            }
            Axis::X => {
                style.insert("width".into(), format!("{diameter}px"));
                style.insert("height".into(), "6px".into());
            }
            Axis::Y => {
                style.insert("width".into(), "6px".into());
                style.insert("height".into(), format!("{diameter}px"));
            }
        }

        style.insert("color".into(), "hsla(0, 90%, 100%, 0.5)".into());
        style.insert("border".into(), "2px solid currentColor".into());

        style.extend(user_style);
        self.style = style;
        Ok(())
    }
}
