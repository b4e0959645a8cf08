//! Data model for receiver state

mod device_state;

pub use device_state::DeviceState;
pub use pioneer_api::PowerState;
