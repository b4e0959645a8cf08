//! One-time discovery of the receiver's source catalog
//!
//! When no sources are configured, every slot address is probed with
//! `?RGBnn`. Slots that answer with a name become catalog entries; silent
//! slots are skipped.

use pioneer_api::{CodeTable, Query, Session, SourceNameQuery, MAX_SOURCE_NUMBERS};
use telnet_client::LineStream;
use tracing::{debug, info, warn};

/// Probe slots `00`..`59` and build a catalog from the names reported
///
/// A name that already belongs to another slot is skipped so the catalog
/// stays one-to-one; the lowest slot wins.
pub fn discover_sources<S: LineStream>(session: &mut Session<S>) -> CodeTable {
    let mut catalog = CodeTable::new();

    for slot in 0..MAX_SOURCE_NUMBERS {
        let query = SourceNameQuery::new(slot);
        let Some(name) = session.query(&query) else {
            debug!("no name for source slot {}", query.code());
            continue;
        };

        if let Err(e) = catalog.insert(name, query.code()) {
            warn!("ignoring source slot {}: {}", query.code(), e);
        }
    }

    info!(
        "discovered {} sources after probing {} slots ({})",
        catalog.len(),
        MAX_SOURCE_NUMBERS,
        SourceNameQuery::PREFIX
    );
    catalog
}
