//! StateManager - drives refresh cycles against one receiver

use pioneer_api::{CodeTable, PioneerClient};
use telnet_client::{Connect, TelnetConnector};
use tracing::{debug, warn};

use crate::refresh::read_device_state;
use crate::store::StateStore;
use crate::{DeviceState, Result, StateError};

/// Owns the client and the state store for a single receiver
///
/// Each [`refresh`](StateManager::refresh) opens its own connection, runs the
/// query sequence, closes the connection and publishes the new snapshot.
/// Calls must be serialized by the caller; reads through
/// [`store`](StateManager::store) may happen at any time.
#[derive(Debug)]
pub struct StateManager<C = TelnetConnector> {
    client: PioneerClient<C>,
    store: StateStore,
}

impl<C: Connect> StateManager<C> {
    /// `sources` may be empty, in which case the catalog is discovered on
    /// the first refresh that reaches the receiver
    pub fn new(client: PioneerClient<C>, sources: CodeTable, sound_modes: CodeTable) -> Self {
        Self {
            client,
            store: StateStore::new(sources, sound_modes),
        }
    }

    pub fn client(&self) -> &PioneerClient<C> {
        &self.client
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn snapshot(&self) -> DeviceState {
        self.store.snapshot()
    }

    /// Run one refresh cycle
    ///
    /// If the receiver cannot be reached the previous snapshot is left
    /// untouched and [`StateError::Connection`] is returned; the caller should
    /// skip this cycle. Once connected, the refresh always succeeds, with
    /// unanswered queries recorded as unknown.
    pub fn refresh(&self) -> Result<()> {
        let mut session = self.client.open().map_err(|e| {
            warn!("refresh skipped, receiver unreachable: {}", e);
            StateError::from(e)
        })?;

        let state = read_device_state(&mut session, &self.store);
        session.close();

        debug!("refreshed state: {:?}", state);
        self.store.publish(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PowerState;
    use telnet_client::testing::ScriptedDevice;
    use telnet_client::TelnetError;

    fn manager(device: &ScriptedDevice, sources: CodeTable) -> StateManager<ScriptedDevice> {
        StateManager::new(
            PioneerClient::with_connector(device.clone()),
            sources,
            CodeTable::from_pairs([("STEREO", "0001")]).unwrap(),
        )
    }

    fn answer_all(device: &ScriptedDevice) {
        device.reply("?P", ["PWR0"]);
        device.reply("?V", ["VOL050"]);
        device.reply("?M", ["MUT0"]);
        device.reply("?S", ["SR0001"]);
        device.reply("?F", ["FN05"]);
    }

    #[test]
    fn test_refresh_publishes_and_closes() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        let manager = manager(&device, CodeTable::from_pairs([("Apple TV", "05")]).unwrap());

        manager.refresh().unwrap();

        let state = manager.snapshot();
        assert_eq!(state.power, PowerState::On);
        assert_eq!(state.muted, Some(true));
        assert_eq!(state.source.as_deref(), Some("Apple TV"));
        assert_eq!(manager.store().generation(), 1);
        assert_eq!(device.connections(), 1);
        assert_eq!(device.closed(), 1);
    }

    #[test]
    fn test_connect_failure_keeps_previous_snapshot() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        let manager = manager(&device, CodeTable::from_pairs([("Apple TV", "05")]).unwrap());
        manager.refresh().unwrap();
        let before = manager.snapshot();

        device.refuse(TelnetError::Connection("refused".to_string()));
        let result = manager.refresh();

        assert!(matches!(result, Err(StateError::Connection(_))));
        assert_eq!(manager.snapshot(), before);
        assert_eq!(manager.store().generation(), 1);
    }

    #[test]
    fn test_unanswered_fields_reset_to_unknown() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        let manager = manager(&device, CodeTable::from_pairs([("Apple TV", "05")]).unwrap());
        manager.refresh().unwrap();

        device.forget("?V");
        device.forget("?S");
        manager.refresh().unwrap();

        let state = manager.snapshot();
        assert_eq!(state.volume, None);
        assert_eq!(state.sound_mode, None);
        assert_eq!(state.power, PowerState::On);
    }

    #[test]
    fn test_catalog_discovered_once() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        device.reply("?RGB05", ["RGB051Apple TV"]);
        let manager = manager(&device, CodeTable::new());

        manager.refresh().unwrap();
        assert_eq!(manager.store().source_names(), vec!["Apple TV"]);

        device.clear_written();
        manager.refresh().unwrap();
        assert!(device.written().iter().all(|c| !c.starts_with("?RGB")));
        assert_eq!(manager.snapshot().source.as_deref(), Some("Apple TV"));
    }

    #[test]
    fn test_empty_discovery_retried_next_cycle() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        let manager = manager(&device, CodeTable::new());

        manager.refresh().unwrap();
        assert!(manager.store().catalog_is_empty());
        assert_eq!(manager.snapshot().source, None);

        device.reply("?RGB05", ["RGB051Apple TV"]);
        manager.refresh().unwrap();
        assert_eq!(manager.snapshot().source.as_deref(), Some("Apple TV"));
    }

    #[test]
    fn test_static_catalog_never_probed() {
        let device = ScriptedDevice::new();
        answer_all(&device);
        let manager = manager(&device, CodeTable::from_pairs([("Apple TV", "05")]).unwrap());

        manager.refresh().unwrap();
        assert!(device.written().iter().all(|c| !c.starts_with("?RGB")));
    }
}
