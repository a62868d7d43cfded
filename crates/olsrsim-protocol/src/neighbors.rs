//! One-hop and two-hop neighbor tables, built from HELLO messages.
//!
//! Tables are `BTreeMap`s so every iteration runs in ascending node-id
//! order; the routing and MPR tie-breaks depend on that.

use std::collections::{BTreeMap, BTreeSet};

use olsrsim_core::{HelloMessage, NodeId, Tick};

/// A node's perception of the link with a one-hop neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborState {
    /// A HELLO arrived from the neighbor, but it has not yet confirmed
    /// hearing us.
    Unidirectional,
    /// The neighbor listed us in a HELLO, confirming both directions.
    Bidirectional,
    /// Bidirectional, and selected by us as a multipoint relay.
    Mpr,
}

impl NeighborState {
    /// Whether the link is confirmed in both directions.
    #[must_use]
    pub fn is_symmetric(self) -> bool {
        matches!(self, NeighborState::Bidirectional | NeighborState::Mpr)
    }
}

/// One row of the one-hop neighbor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHopNeighbor {
    pub neighbor: NodeId,
    pub state: NeighborState,
    pub hold_until: Tick,
}

/// One-hop neighbors keyed by id.
pub type OneHopTable = BTreeMap<NodeId, OneHopNeighbor>;

/// Two-hop destinations reachable via each one-hop neighbor.
pub type TwoHopTable = BTreeMap<NodeId, BTreeSet<NodeId>>;

/// Refresh the one-hop entry for the sender of `msg`.
///
/// A first HELLO creates the entry as `Unidirectional`. Later HELLOs
/// refresh the hold time and set the state to `Bidirectional` when our
/// own id appears in any of the advertised lists, `Unidirectional`
/// otherwise. `Mpr` is never assigned here; it is the outcome of local
/// MPR selection.
pub fn update_one_hop(
    table: &mut OneHopTable,
    msg: &HelloMessage,
    hold_until: Tick,
    own_id: NodeId,
) {
    match table.get_mut(&msg.source) {
        None => {
            table.insert(
                msg.source,
                OneHopNeighbor {
                    neighbor: msg.source,
                    state: NeighborState::Unidirectional,
                    hold_until,
                },
            );
        }
        Some(entry) => {
            entry.hold_until = hold_until;

            let heard_us = msg
                .unidirectional
                .iter()
                .chain(&msg.bidirectional)
                .chain(&msg.mpr)
                .any(|&id| id == own_id);

            entry.state = if heard_us {
                NeighborState::Bidirectional
            } else {
                NeighborState::Unidirectional
            };
        }
    }
}

/// Replace the two-hop slot for the sender of `msg`.
///
/// Only the bidirectional and MPR lists count: a unidirectional link
/// from the sender outward does not establish a usable forward path.
/// Our own id is never recorded as a two-hop destination.
pub fn update_two_hop(table: &mut TwoHopTable, msg: &HelloMessage, own_id: NodeId) {
    let reachable: BTreeSet<NodeId> = msg
        .bidirectional
        .iter()
        .chain(&msg.mpr)
        .copied()
        .filter(|&id| id != own_id)
        .collect();
    table.insert(msg.source, reachable);
}

/// Drop one-hop entries whose hold time has passed, together with their
/// two-hop slots.
pub fn expire_neighbors(one_hop: &mut OneHopTable, two_hop: &mut TwoHopTable, now: Tick) {
    one_hop.retain(|id, entry| {
        if entry.hold_until <= now {
            two_hop.remove(id);
            false
        } else {
            true
        }
    });
}
