//! Device state for Pioneer receivers
//!
//! Keeps an in-memory snapshot of a receiver's status that callers can read
//! without touching the network, and refreshes it by polling:
//!
//! ```text
//! Connect -> ?P -> ?V -> ?M -> ?S -> (discover sources) -> ?F -> Disconnect
//!                                          |
//!                         only while the catalog is empty
//! ```
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use pioneer_api::{CodeTable, PioneerClient};
//! use pioneer_state::StateManager;
//!
//! let client = PioneerClient::new("192.168.1.50", 23, Duration::from_secs(5));
//! let manager = StateManager::new(client, CodeTable::new(), CodeTable::new());
//!
//! if manager.refresh().is_ok() {
//!     println!("{:?}", manager.snapshot());
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod logging;
pub mod manager;
pub mod model;
pub mod refresh;
pub mod store;

pub use error::{Result, StateError};
pub use manager::StateManager;
pub use model::{DeviceState, PowerState};
pub use store::StateStore;
