//! Pioneer SDK - control network-attached Pioneer receivers
//!
//! A [`Receiver`] wraps one AV receiver reachable over its line-oriented
//! control port. Hosts poll it with [`Receiver::update`], read state from the
//! published snapshot and fire commands that never return errors.
//!
//! ```rust,no_run
//! use pioneer_sdk::{Receiver, ReceiverConfig};
//!
//! let config = ReceiverConfig::new("192.168.1.50")
//!     .with_name("Living Room")
//!     .with_port(8102);
//!
//! let receiver = Receiver::connect(&config)?;
//! println!("{} is on: {}", receiver.name(), receiver.is_on());
//!
//! receiver.set_volume_level(0.35);
//! if receiver.source_list().iter().any(|s| s == "BD") {
//!     receiver.select_source("BD");
//! }
//! # Ok::<(), pioneer_sdk::SdkError>(())
//! ```

pub mod config;
mod error;
mod receiver;

pub use config::{ReceiverConfig, SoundModeConfig, ValidatedConfig};
pub use error::SdkError;
pub use receiver::{Feature, Receiver};

pub use pioneer_api::{ApiError, Command, PowerState, SOUND_MODES};
pub use pioneer_state::logging::{
    init_logging, init_logging_from_env, init_logging_with_filter, LoggingError, LoggingMode,
};
pub use pioneer_state::DeviceState;
