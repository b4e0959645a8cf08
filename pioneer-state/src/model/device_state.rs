//! Device state snapshot type

use super::PowerState;
use serde::{Deserialize, Serialize};

/// Everything learned about a receiver in one refresh cycle
///
/// A field is `None` (or [`PowerState::Unknown`]) when the receiver did not
/// answer the corresponding query. Values are never carried over from an
/// earlier cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    pub power: PowerState,
    /// Volume normalized to 0..1
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    /// Name of the active input
    pub source: Option<String>,
    /// Name of the active listening mode
    pub sound_mode: Option<String>,
}

impl DeviceState {
    /// A snapshot with every field unknown
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.power.is_on()
    }

    /// Volume as a percentage (0.0 - 100.0)
    pub fn volume_percent(&self) -> Option<f64> {
        self.volume.map(|v| v * 100.0)
    }
}
