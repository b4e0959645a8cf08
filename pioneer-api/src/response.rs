//! Decoding of status replies
//!
//! Replies are a fixed prefix followed by a value: `PWR0`, `VOL050`, `MUT1`,
//! `SR0001`, `FN05`, `RGB051BD`. Anything malformed decodes to "unknown"
//! rather than an error.

use serde::{Deserialize, Serialize};

use crate::command::raw_to_volume;

/// Length of the `RGBnnf` header in front of a source name
pub const SOURCE_NAME_HEADER: usize = 6;

/// Power state reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerState {
    On,
    Off,
    #[default]
    Unknown,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        self == PowerState::On
    }
}

/// `PWR0` is on; `PWR1` and `PWR2` (standby variants) are off
pub fn decode_power(reply: &str) -> PowerState {
    match reply {
        "PWR0" => PowerState::On,
        "PWR1" | "PWR2" => PowerState::Off,
        _ => PowerState::Unknown,
    }
}

/// `VOLnnn` to a level in [0, 1]
pub fn decode_volume(reply: &str) -> Option<f64> {
    let raw = reply.strip_prefix("VOL")?.trim().parse::<u32>().ok()?;
    Some(raw_to_volume(raw))
}

/// `MUT0` means muted; any other `MUT` value means not muted
pub fn decode_mute(reply: &str) -> Option<bool> {
    reply.starts_with("MUT").then(|| reply == "MUT0")
}

/// The code following `prefix`, e.g. `05` from `FN05`
pub fn decode_code<'a>(reply: &'a str, prefix: &str) -> Option<&'a str> {
    let code = reply.strip_prefix(prefix)?.trim();
    (!code.is_empty()).then_some(code)
}

/// The source name from an `RGB` reply, after the slot and flag header
pub fn decode_source_name(reply: &str) -> Option<&str> {
    if !reply.starts_with("RGB") {
        return None;
    }
    let name = reply.get(SOURCE_NAME_HEADER..)?.trim();
    (!name.is_empty()).then_some(name)
}
