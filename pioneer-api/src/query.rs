//! Typed status queries
//!
//! Each query knows the command that asks for a value, the prefix of the
//! reply that carries it, and how to decode that reply.

use crate::response::{self, PowerState};

/// Number of source slots probed during discovery (`00`..`59`)
pub const MAX_SOURCE_NUMBERS: u8 = 60;

/// A status query and the decoding of its reply
pub trait Query {
    /// The decoded value
    type Output;

    /// Prefix identifying the reply among unsolicited pushes
    const PREFIX: &'static str;

    /// The command asking for the value
    fn command(&self) -> String;

    /// Decode a reply already known to start with [`Query::PREFIX`]
    fn parse(&self, reply: &str) -> Option<Self::Output>;
}

/// `?P` -> `PWRn`
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerQuery;

impl Query for PowerQuery {
    type Output = PowerState;
    const PREFIX: &'static str = "PWR";

    fn command(&self) -> String {
        "?P".to_string()
    }

    fn parse(&self, reply: &str) -> Option<PowerState> {
        Some(response::decode_power(reply))
    }
}

/// `?V` -> `VOLnnn`, normalized to [0, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeQuery;

impl Query for VolumeQuery {
    type Output = f64;
    const PREFIX: &'static str = "VOL";

    fn command(&self) -> String {
        "?V".to_string()
    }

    fn parse(&self, reply: &str) -> Option<f64> {
        response::decode_volume(reply)
    }
}

/// `?M` -> `MUTn`
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteQuery;

impl Query for MuteQuery {
    type Output = bool;
    const PREFIX: &'static str = "MUT";

    fn command(&self) -> String {
        "?M".to_string()
    }

    fn parse(&self, reply: &str) -> Option<bool> {
        response::decode_mute(reply)
    }
}

/// `?S` -> `SRnnnn`, yielding the raw listening-mode code
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundModeQuery;

impl Query for SoundModeQuery {
    type Output = String;
    const PREFIX: &'static str = "SR";

    fn command(&self) -> String {
        "?S".to_string()
    }

    fn parse(&self, reply: &str) -> Option<String> {
        response::decode_code(reply, Self::PREFIX).map(str::to_string)
    }
}

/// `?F` -> `FNnn`, yielding the raw slot code of the active input
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceQuery;

impl Query for SourceQuery {
    type Output = String;
    const PREFIX: &'static str = "FN";

    fn command(&self) -> String {
        "?F".to_string()
    }

    fn parse(&self, reply: &str) -> Option<String> {
        response::decode_code(reply, Self::PREFIX).map(str::to_string)
    }
}

/// `?RGBnn` -> `RGBnnf<name>`, yielding the name assigned to slot `nn`
#[derive(Debug, Clone, Copy)]
pub struct SourceNameQuery {
    pub slot: u8,
}

impl SourceNameQuery {
    pub fn new(slot: u8) -> Self {
        Self { slot }
    }

    /// The slot as the 2-digit code used by `FN` commands and replies
    pub fn code(&self) -> String {
        format!("{:02}", self.slot)
    }
}

impl Query for SourceNameQuery {
    type Output = String;
    const PREFIX: &'static str = "RGB";

    fn command(&self) -> String {
        format!("?RGB{}", self.code())
    }

    fn parse(&self, reply: &str) -> Option<String> {
        response::decode_source_name(reply).map(str::to_string)
    }
}
