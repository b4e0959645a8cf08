//! High-level API for Pioneer receiver control
//!
//! This crate maps domain operations onto the receiver's fixed-width ASCII
//! command grammar and decodes status replies into typed values. It uses the
//! private `telnet-client` crate for the socket and reply correlation.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pioneer_api::{Command, PioneerClient, PowerQuery, VolumeQuery};
//!
//! let client = PioneerClient::new("192.168.1.50", 23, Duration::from_secs(5));
//!
//! let mut session = client.open()?;
//! let power = session.query(&PowerQuery);
//! let volume = session.query(&VolumeQuery);
//! session.close();
//!
//! client.send(&Command::SetVolume(0.4))?;
//! # Ok::<(), pioneer_api::ApiError>(())
//! ```

pub mod client;
pub mod code_table;
pub mod command;
pub mod error;
pub mod query;
pub mod response;
pub mod sound_modes;

pub use client::{PioneerClient, Session};
pub use code_table::CodeTable;
pub use command::{raw_to_volume, volume_to_raw, Command, MAX_VOLUME};
pub use error::{ApiError, Result};
pub use query::{
    MuteQuery, PowerQuery, Query, SoundModeQuery, SourceNameQuery, SourceQuery, VolumeQuery,
    MAX_SOURCE_NUMBERS,
};
pub use response::PowerState;
pub use sound_modes::{sound_mode_code, SOUND_MODES};

pub use telnet_client::{Connect, TelnetConnector, TelnetError};
