//! Gamepad layout files.
//!
//! A layout describes the controls of one gamepad and the host options it
//! expects. It is plain TOML:
//!
//! ```toml
//! name = "Twin stick"
//! vibration = true
//! fullscreen_on_click = false
//!
//! [[controllers]]
//! id = "move"
//! type = "joystick"
//! radius = 60.0
//! fixed = false
//! position = { left = "25%", top = "50%" }
//!
//! [[controllers]]
//! id = "fire"
//! type = "button"
//! text = "A"
//! ```

use crate::controller::{ControllerKind, ControllerOptions, Position};
use crate::gamepad::{Gamepad, GamepadError, Host};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const APP_DIR: &str = "virtual-gamepad";
pub const LAYOUT_FILE: &str = "layout.toml";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Layout has no controllers")]
    Empty,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Layout {
    pub name: String,
    /// Whether the host supports haptics
    pub vibration: bool,
    pub fullscreen_on_click: bool,
    pub controllers: Vec<ControllerOptions>,
}

impl Layout {
    /// `<config dir>/virtual-gamepad/layout.toml`, if the platform has a
    /// config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(LAYOUT_FILE))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, LayoutError> {
        let layout: Layout = toml::from_str(content)?;
        if layout.controllers.is_empty() {
            return Err(LayoutError::Empty);
        }
        debug!(
            "Parsed layout '{}' with {} controllers",
            layout.name,
            layout.controllers.len()
        );
        Ok(layout)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        info!("Loading layout from {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LayoutError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    /// Loads `path`, or the default location when `path` is `None`. Falls
    /// back to the built-in layout when no file exists there.
    pub async fn load_or_default(path: Option<PathBuf>) -> Result<Self, LayoutError> {
        let Some(path) = path.or_else(Self::default_path) else {
            warn!("No config directory available, using built-in layout");
            return Ok(Self::builtin());
        };

        match tokio::fs::try_exists(&path).await {
            Ok(true) => Self::load(&path).await,
            Ok(false) => {
                info!("No layout at {}, using built-in layout", path.display());
                Ok(Self::builtin())
            }
            Err(source) => Err(LayoutError::Io { path, source }),
        }
    }

    /// Single-stick layout with two face buttons
    pub fn builtin() -> Self {
        let stick = ControllerOptions::new("joystick_1", ControllerKind::Joystick)
            .radius(60.0)
            .fixed(false)
            .position(Position {
                left: Some("25%".into()),
                top: Some("50%".into()),
                ..Default::default()
            });
        let fire = ControllerOptions::button("button_a").text("A").position(Position {
            right: Some("15%".into()),
            bottom: Some("30%".into()),
            ..Default::default()
        });
        let toggle = ControllerOptions::button("button_b")
            .text("B")
            .spring(false)
            .position(Position {
                right: Some("5%".into()),
                bottom: Some("40%".into()),
                ..Default::default()
            });

        Self {
            name: "Built-in".into(),
            vibration: false,
            fullscreen_on_click: false,
            controllers: vec![stick, fire, toggle],
        }
    }

    /// Builds a gamepad on `host` with every controller of the layout
    pub fn into_gamepad<H: Host>(self, host: H) -> Result<Gamepad<H>, GamepadError> {
        let mut gamepad = Gamepad::new(host);
        gamepad.add_all(self.controllers)?;
        if self.fullscreen_on_click {
            gamepad.request_full_screen();
        }
        info!("Layout '{}' ready with {} controllers", self.name, gamepad.len());
        Ok(gamepad)
    }
}
