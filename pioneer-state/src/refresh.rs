//! The refresh query sequence
//!
//! One refresh visits, in order: power, volume, mute, sound mode, the source
//! catalog (only while it is empty) and the active source. A query that gets
//! no answer leaves its field unknown; the sequence never branches on it.

use pioneer_api::{
    CodeTable, MuteQuery, PowerQuery, PowerState, Session, SoundModeQuery, SourceQuery, VolumeQuery,
};
use telnet_client::LineStream;
use tracing::{debug, info};

use crate::discovery::discover_sources;
use crate::model::DeviceState;
use crate::store::StateStore;

/// Run the query sequence over an open session and return the new snapshot
///
/// The store's catalog may be populated as a side effect; the snapshot itself
/// is not published here.
pub fn read_device_state<S: LineStream>(session: &mut Session<S>, store: &StateStore) -> DeviceState {
    let power = session.query(&PowerQuery).unwrap_or(PowerState::Unknown);
    let volume = session.query(&VolumeQuery);
    let muted = session.query(&MuteQuery);

    let sound_mode = session
        .query(&SoundModeQuery)
        .and_then(|code| resolve(store.sound_modes(), &code, "sound mode"));

    if store.catalog_is_empty() {
        let catalog = discover_sources(session);
        if store.install_catalog(catalog) {
            info!("source catalog: {:?}", store.source_names());
        }
    }

    let source = session.query(&SourceQuery).and_then(|code| {
        let name = store.source_name(&code);
        if name.is_none() {
            debug!("source code {} not in catalog", code);
        }
        name
    });

    DeviceState {
        power,
        volume,
        muted,
        source,
        sound_mode,
    }
}

fn resolve(table: &CodeTable, code: &str, kind: &str) -> Option<String> {
    let name = table.name(code).map(str::to_string);
    if name.is_none() {
        debug!("{} code {} not in table", kind, code);
    }
    name
}
