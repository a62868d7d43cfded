//! Greedy multipoint-relay selection.

use std::collections::BTreeSet;

use olsrsim_core::NodeId;

use crate::neighbors::{NeighborState, OneHopTable, TwoHopTable};

/// Recompute the MPR set from the current neighbor tables and rewrite
/// one-hop states to reflect the new selection.
///
/// Classical set-cover greedy by cardinality: symmetric neighbors are
/// taken in descending order of two-hop reach (ties in ascending id
/// order) until every two-hop destination reachable via a symmetric
/// neighbor is covered. Selected neighbors become `Mpr`; previously
/// selected neighbors that lost the slot drop back to `Bidirectional`;
/// unidirectional neighbors are untouched and never selected.
pub fn select_mprs(one_hop: &mut OneHopTable, two_hop: &TwoHopTable) {
    // Candidates in ascending id order, so the later stable sort breaks
    // reach ties deterministically.
    let mut candidates: Vec<(NodeId, &BTreeSet<NodeId>)> = Vec::new();
    let mut uncovered: BTreeSet<NodeId> = BTreeSet::new();

    for (neighbor, reaches) in two_hop {
        let Some(entry) = one_hop.get(neighbor) else {
            continue;
        };
        if entry.state == NeighborState::Unidirectional {
            continue;
        }
        candidates.push((*neighbor, reaches));
        uncovered.extend(reaches.iter().copied());
    }

    candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut selected: BTreeSet<NodeId> = BTreeSet::new();
    let mut order = candidates.into_iter();
    while !uncovered.is_empty() {
        let Some((neighbor, reaches)) = order.next() else {
            // No candidate left can reduce the uncovered set; proceed
            // with partial coverage rather than spinning.
            tracing::warn!(
                remaining = uncovered.len(),
                "two-hop destinations left uncovered by MPR selection"
            );
            break;
        };
        selected.insert(neighbor);
        for dst in reaches {
            uncovered.remove(dst);
        }
    }

    for (id, entry) in one_hop.iter_mut() {
        if selected.contains(id) {
            entry.state = NeighborState::Mpr;
        } else if entry.state == NeighborState::Mpr {
            entry.state = NeighborState::Bidirectional;
        }
    }
}
