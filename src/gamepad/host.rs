//! Host platform capabilities used by the gamepad: haptics and fullscreen.
//!
//! Both are best effort. A host without haptics simply reports it, and the
//! gamepad turns vibration requests into no-ops.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Vibration request: one duration, or alternating on/off durations in ms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VibrationPattern {
    Single(u32),
    Sequence(Vec<u32>),
}

impl VibrationPattern {
    /// Flattened on/off durations in milliseconds
    pub fn durations(&self) -> Vec<u32> {
        match self {
            VibrationPattern::Single(ms) => vec![*ms],
            VibrationPattern::Sequence(pattern) => pattern.clone(),
        }
    }

    /// Total time covered by the pattern, pauses included
    pub fn total_ms(&self) -> u64 {
        self.durations().iter().map(|ms| u64::from(*ms)).sum()
    }
}

impl From<u32> for VibrationPattern {
    fn from(ms: u32) -> Self {
        VibrationPattern::Single(ms)
    }
}

impl From<Vec<u32>> for VibrationPattern {
    fn from(pattern: Vec<u32>) -> Self {
        VibrationPattern::Sequence(pattern)
    }
}

impl From<&[u32]> for VibrationPattern {
    fn from(pattern: &[u32]) -> Self {
        VibrationPattern::Sequence(pattern.to_vec())
    }
}

/// Platform services outside the controls themselves
pub trait Host {
    fn supports_vibration(&self) -> bool {
        false
    }

    /// Only called when [`Host::supports_vibration`] is true
    fn vibrate(&mut self, _pattern: &VibrationPattern) {}

    fn is_fullscreen(&self) -> bool;

    fn request_fullscreen(&mut self);

    fn exit_fullscreen(&mut self);
}

/// Host without a display or actuator. Records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct HeadlessHost {
    vibration: bool,
    fullscreen: bool,
    pub vibrations: Vec<VibrationPattern>,
    pub fullscreen_requests: usize,
}

impl HeadlessHost {
    pub fn new(vibration: bool) -> Self {
        Self {
            vibration,
            ..Default::default()
        }
    }
}

impl Host for HeadlessHost {
    fn supports_vibration(&self) -> bool {
        self.vibration
    }

    fn vibrate(&mut self, pattern: &VibrationPattern) {
        info!("Vibrating {:?} ({} ms)", pattern.durations(), pattern.total_ms());
        self.vibrations.push(pattern.clone());
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn request_fullscreen(&mut self) {
        debug!("Entering fullscreen");
        self.fullscreen = true;
        self.fullscreen_requests += 1;
    }

    fn exit_fullscreen(&mut self) {
        debug!("Leaving fullscreen");
        self.fullscreen = false;
    }
}
