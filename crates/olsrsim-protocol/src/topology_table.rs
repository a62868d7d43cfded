//! Per-node topology table, built from TC messages.

use std::collections::BTreeMap;

use olsrsim_core::{NodeId, TcMessage, Tick};

/// One advertised (originator, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyEntry {
    pub destination: NodeId,
    pub originator: NodeId,
    pub hold_until: Tick,
    pub sequence: u64,
}

/// originator -> destination -> entry.
pub type TopologyTable = BTreeMap<NodeId, BTreeMap<NodeId, TopologyEntry>>;

/// Apply a TC message to the table. Returns whether the table changed.
///
/// A TC whose sequence is strictly older than any recorded entry for the
/// same originator is dropped whole. Otherwise the originator's slot is
/// replaced in full: one entry per advertised destination at the new
/// hold time, skipping our own id.
pub fn apply_tc(
    table: &mut TopologyTable,
    msg: &TcMessage,
    hold_until: Tick,
    own_id: NodeId,
) -> bool {
    if let Some(entries) = table.get(&msg.source) {
        let stale = msg
            .ms_set
            .iter()
            .any(|dst| entries.get(dst).is_some_and(|e| e.sequence > msg.sequence));
        if stale {
            return false;
        }
    }

    let fresh: BTreeMap<NodeId, TopologyEntry> = msg
        .ms_set
        .iter()
        .copied()
        .filter(|&dst| dst != own_id)
        .map(|dst| {
            (
                dst,
                TopologyEntry {
                    destination: dst,
                    originator: msg.source,
                    hold_until,
                    sequence: msg.sequence,
                },
            )
        })
        .collect();
    table.insert(msg.source, fresh);
    true
}

/// Drop entries whose hold time has passed.
pub fn expire_topology(table: &mut TopologyTable, now: Tick) {
    for entries in table.values_mut() {
        entries.retain(|_, entry| entry.hold_until > now);
    }
}
