//! Encoding of control commands
//!
//! Every command is a short fixed literal, optionally preceded by a
//! zero-padded numeric argument (`050VL`, `05FN`, `0001SR`). Commands are
//! fire-and-forget: the receiver's echo is drained, not checked.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ApiError, Result};

/// Raw volume step corresponding to a normalized level of 1.0
pub const MAX_VOLUME: u32 = 185;

/// Convert a normalized level to the receiver's 0..=185 scale
///
/// Out-of-range levels are clamped; NaN maps to 0.
pub fn volume_to_raw(level: f64) -> u32 {
    if level.is_nan() {
        return 0;
    }
    (level.clamp(0.0, 1.0) * MAX_VOLUME as f64).round() as u32
}

/// Convert a raw volume step to a normalized level in [0, 1]
pub fn raw_to_volume(raw: u32) -> f64 {
    raw.min(MAX_VOLUME) as f64 / MAX_VOLUME as f64
}

/// A control command for the receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    PowerOn,
    PowerOff,
    VolumeUp,
    VolumeDown,
    /// Absolute volume, normalized to 0..1
    SetVolume(f64),
    /// `true` mutes, `false` unmutes
    Mute(bool),
    /// Select the input with this 2-digit slot code
    SelectSource(String),
    /// Select the listening mode with this 4-digit code
    SelectSoundMode(String),
}

impl Command {
    /// The wire form of the command, without terminator
    pub fn encode(&self) -> String {
        match self {
            Command::PowerOn => "PO".to_string(),
            Command::PowerOff => "PF".to_string(),
            Command::VolumeUp => "VU".to_string(),
            Command::VolumeDown => "VD".to_string(),
            Command::SetVolume(level) => format!("{:03}VL", volume_to_raw(*level)),
            Command::Mute(true) => "MO".to_string(),
            Command::Mute(false) => "MF".to_string(),
            Command::SelectSource(code) => format!("{}FN", code),
            Command::SelectSoundMode(code) => format!("{}SR", code),
        }
    }

    /// Reject arguments that would produce a malformed command
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::SelectSource(code) => validate_code("source", code, 2),
            Command::SelectSoundMode(code) => validate_code("sound mode", code, 4),
            _ => Ok(()),
        }
    }
}

fn validate_code(kind: &str, code: &str, width: usize) -> Result<()> {
    if code.len() == width && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiError::InvalidParameter(format!(
            "{} code '{}' must be {} digits",
            kind, code, width
        )))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
