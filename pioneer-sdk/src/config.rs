//! Receiver configuration
//!
//! Everything a [`Receiver`](crate::Receiver) needs is described by a
//! [`ReceiverConfig`], which can be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "name": "Living Room AVR",
//!   "host": "192.168.1.50",
//!   "port": 8102,
//!   "timeout": 3.0,
//!   "sources": { "Apple TV": "05", "BD": "25" },
//!   "sound_modes": ["STEREO", "AUTO SURROUND", "PURE DIRECT"]
//! }
//! ```
//!
//! All validation happens before any connection is attempted.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use pioneer_api::{sound_modes, CodeTable};
use serde::{Deserialize, Serialize};

use crate::SdkError;

pub const DEFAULT_NAME: &str = "Pioneer AVR";

/// Telnet default; some models listen on 8102 instead
pub const DEFAULT_PORT: u16 = 23;

/// Connect and write timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// Which listening modes to offer
///
/// Either a list of names whose codes come from the built-in table, or an
/// explicit name -> code map. Names must be known in both forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundModeConfig {
    Names(Vec<String>),
    Codes(BTreeMap<String, String>),
}

impl Default for SoundModeConfig {
    fn default() -> Self {
        SoundModeConfig::Names(Vec::new())
    }
}

impl SoundModeConfig {
    pub fn to_table(&self) -> Result<CodeTable, SdkError> {
        let table = match self {
            SoundModeConfig::Names(names) => sound_modes::table_from_names(names),
            SoundModeConfig::Codes(codes) => sound_modes::table_from_codes(codes),
        };
        table.map_err(|e| SdkError::InvalidConfig(e.to_string()))
    }
}

/// Configuration for one receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Display name, used in log messages
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Connect and write timeout in seconds
    pub timeout: f64,
    /// Source name -> 2-digit slot code; discovered from the receiver when empty
    pub sources: BTreeMap<String, String>,
    pub sound_modes: SoundModeConfig,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            host: String::new(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT_SECS,
            sources: BTreeMap::new(),
            sound_modes: SoundModeConfig::default(),
        }
    }
}

/// Everything a successful [`ReceiverConfig::validate`] produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub sources: CodeTable,
    pub sound_modes: CodeTable,
    pub timeout: Duration,
}

impl ReceiverConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.as_secs_f64();
        self
    }

    pub fn with_source(mut self, name: impl Into<String>, code: impl Into<String>) -> Self {
        self.sources.insert(name.into(), code.into());
        self
    }

    pub fn with_sound_modes(mut self, sound_modes: SoundModeConfig) -> Self {
        self.sound_modes = sound_modes;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SdkError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The timeout as a non-zero `Duration`
    pub fn timeout_duration(&self) -> Result<Duration, SdkError> {
        Duration::try_from_secs_f64(self.timeout)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or_else(|| {
                SdkError::InvalidConfig(format!(
                    "timeout must be a positive number of seconds, got {}",
                    self.timeout
                ))
            })
    }

    /// Check the configuration and build the source and sound mode tables
    pub fn validate(&self) -> Result<ValidatedConfig, SdkError> {
        if self.host.trim().is_empty() {
            return Err(SdkError::InvalidConfig("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(SdkError::InvalidConfig("port must be non-zero".to_string()));
        }
        let timeout = self.timeout_duration()?;

        let mut sources = CodeTable::new();
        for (name, code) in &self.sources {
            if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SdkError::InvalidConfig(format!(
                    "source '{}' has code '{}', expected 2 digits",
                    name, code
                )));
            }
            sources
                .insert(name.as_str(), code.as_str())
                .map_err(|e| SdkError::InvalidConfig(e.to_string()))?;
        }

        Ok(ValidatedConfig {
            sources,
            sound_modes: self.sound_modes.to_table()?,
            timeout,
        })
    }
}
