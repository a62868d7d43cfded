//! Routing-table derivation.

use std::collections::BTreeMap;

use olsrsim_core::NodeId;

use crate::constants::MAX_ROUTE_HOPS;
use crate::neighbors::{OneHopTable, TwoHopTable};
use crate::topology_table::TopologyTable;

/// One derived route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub destination: NodeId,
    pub next_hop: NodeId,
    pub distance: u32,
}

/// destination -> route.
pub type RoutingTable = BTreeMap<NodeId, Route>;

/// Rebuild the routing table from scratch.
///
/// Symmetric one-hop neighbors first, then two-hop destinations, then
/// hop-by-hop expansion through advertised topology entries until a
/// pass adds nothing. The first route found for a destination wins;
/// tables iterate in ascending id order, so ties resolve to the
/// smallest neighbor or originator id at that distance.
#[must_use]
pub fn build_routing_table(
    one_hop: &OneHopTable,
    two_hop: &TwoHopTable,
    topology: &TopologyTable,
) -> RoutingTable {
    let mut routes = RoutingTable::new();

    for entry in one_hop.values() {
        if entry.state.is_symmetric() {
            routes.insert(
                entry.neighbor,
                Route {
                    destination: entry.neighbor,
                    next_hop: entry.neighbor,
                    distance: 1,
                },
            );
        }
    }

    for (neighbor, reachable) in two_hop {
        // A slot whose owner is not symmetric offers no usable path.
        if !one_hop
            .get(neighbor)
            .is_some_and(|e| e.state.is_symmetric())
        {
            continue;
        }
        for &dst in reachable {
            routes.entry(dst).or_insert(Route {
                destination: dst,
                next_hop: *neighbor,
                distance: 2,
            });
        }
    }

    for hops in 2..MAX_ROUTE_HOPS {
        let mut added = false;
        for entries in topology.values() {
            for entry in entries.values() {
                if routes.contains_key(&entry.destination) {
                    continue;
                }
                let Some(via) = routes.get(&entry.originator).copied() else {
                    continue;
                };
                if via.distance == hops {
                    routes.insert(
                        entry.destination,
                        Route {
                            destination: entry.destination,
                            next_hop: via.next_hop,
                            distance: hops + 1,
                        },
                    );
                    added = true;
                }
            }
        }
        if !added {
            break;
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::{NeighborState, OneHopNeighbor};
    use crate::topology_table::TopologyEntry;

    fn id(n: u8) -> NodeId {
        NodeId::new(n)
    }

    fn one_hop(entries: &[(u8, NeighborState)]) -> OneHopTable {
        entries
            .iter()
            .map(|&(n, state)| {
                (
                    id(n),
                    OneHopNeighbor {
                        neighbor: id(n),
                        state,
                        hold_until: 20,
                    },
                )
            })
            .collect()
    }

    fn two_hop(slots: &[(u8, &[u8])]) -> TwoHopTable {
        slots
            .iter()
            .map(|&(n, dsts)| (id(n), dsts.iter().copied().map(NodeId::new).collect()))
            .collect()
    }

    fn topology(entries: &[(u8, u8)]) -> TopologyTable {
        // (originator, destination) pairs.
        let mut table = TopologyTable::new();
        for &(orig, dst) in entries {
            table.entry(id(orig)).or_default().insert(
                id(dst),
                TopologyEntry {
                    destination: id(dst),
                    originator: id(orig),
                    hold_until: 100,
                    sequence: 0,
                },
            );
        }
        table
    }

    #[test]
    fn symmetric_neighbors_get_distance_one_routes() {
        let routes = build_routing_table(
            &one_hop(&[
                (1, NeighborState::Bidirectional),
                (2, NeighborState::Mpr),
                (3, NeighborState::Unidirectional),
            ]),
            &TwoHopTable::new(),
            &TopologyTable::new(),
        );

        assert_eq!(
            routes[&id(1)],
            Route { destination: id(1), next_hop: id(1), distance: 1 }
        );
        assert_eq!(
            routes[&id(2)],
            Route { destination: id(2), next_hop: id(2), distance: 1 }
        );
        assert!(!routes.contains_key(&id(3)));
    }

    #[test]
    fn two_hop_destinations_route_via_their_neighbor() {
        let routes = build_routing_table(
            &one_hop(&[(1, NeighborState::Bidirectional)]),
            &two_hop(&[(1, &[4, 5])]),
            &TopologyTable::new(),
        );

        assert_eq!(
            routes[&id(4)],
            Route { destination: id(4), next_hop: id(1), distance: 2 }
        );
        assert_eq!(
            routes[&id(5)],
            Route { destination: id(5), next_hop: id(1), distance: 2 }
        );
    }

    #[test]
    fn one_hop_routes_are_not_shadowed_by_two_hop_reach() {
        let routes = build_routing_table(
            &one_hop(&[
                (1, NeighborState::Bidirectional),
                (2, NeighborState::Bidirectional),
            ]),
            &two_hop(&[(1, &[2])]),
            &TopologyTable::new(),
        );

        assert_eq!(routes[&id(2)].distance, 1);
        assert_eq!(routes[&id(2)].next_hop, id(2));
    }

    #[test]
    fn unidirectional_slot_owners_contribute_no_routes() {
        let routes = build_routing_table(
            &one_hop(&[(1, NeighborState::Unidirectional)]),
            &two_hop(&[(1, &[4])]),
            &TopologyTable::new(),
        );
        assert!(routes.is_empty());
    }

    #[test]
    fn two_hop_ties_resolve_to_the_smallest_neighbor_id() {
        let routes = build_routing_table(
            &one_hop(&[
                (2, NeighborState::Bidirectional),
                (3, NeighborState::Bidirectional),
            ]),
            &two_hop(&[(2, &[7]), (3, &[7])]),
            &TopologyTable::new(),
        );
        assert_eq!(routes[&id(7)].next_hop, id(2));
    }

    #[test]
    fn topology_entries_extend_routes_hop_by_hop() {
        // 0 -- 1 -- 4 -- 6: neighbor 1, two-hop 4, TC from 4 advertising 6.
        let routes = build_routing_table(
            &one_hop(&[(1, NeighborState::Mpr)]),
            &two_hop(&[(1, &[4])]),
            &topology(&[(4, 6)]),
        );

        assert_eq!(
            routes[&id(6)],
            Route { destination: id(6), next_hop: id(1), distance: 3 }
        );
    }

    #[test]
    fn expansion_chains_through_multiple_advertisements() {
        // 1 is a neighbor; 4 at two hops; 6 via TC(4); 8 via TC(6).
        let routes = build_routing_table(
            &one_hop(&[(1, NeighborState::Mpr)]),
            &two_hop(&[(1, &[4])]),
            &topology(&[(4, 6), (6, 8)]),
        );

        assert_eq!(routes[&id(6)].distance, 3);
        assert_eq!(routes[&id(8)].distance, 4);
        assert_eq!(routes[&id(8)].next_hop, id(1));
    }

    #[test]
    fn advertisements_from_unreachable_originators_are_ignored() {
        let routes = build_routing_table(
            &one_hop(&[(1, NeighborState::Bidirectional)]),
            &TwoHopTable::new(),
            &topology(&[(9, 6)]),
        );
        assert!(!routes.contains_key(&id(6)));
    }

    #[test]
    fn every_route_is_sound() {
        let oh = one_hop(&[
            (1, NeighborState::Mpr),
            (2, NeighborState::Bidirectional),
            (3, NeighborState::Unidirectional),
        ]);
        let th = two_hop(&[(1, &[4, 5]), (2, &[5]), (3, &[9])]);
        let topo = topology(&[(4, 6), (5, 7), (6, 8)]);

        let routes = build_routing_table(&oh, &th, &topo);

        for route in routes.values() {
            match route.distance {
                1 => {
                    assert_eq!(route.next_hop, route.destination);
                    assert!(oh[&route.destination].state.is_symmetric());
                }
                2 => {
                    assert!(oh[&route.next_hop].state.is_symmetric());
                    assert!(th[&route.next_hop].contains(&route.destination));
                }
                k => {
                    // A topology entry must land on this destination from
                    // an originator routed at distance k-1 via the same
                    // next hop.
                    let witness = topo.iter().any(|(orig, dsts)| {
                        dsts.contains_key(&route.destination)
                            && routes.get(orig).is_some_and(|r| {
                                r.distance == k - 1 && r.next_hop == route.next_hop
                            })
                    });
                    assert!(witness, "unsound route {route:?}");
                }
            }
        }
        // And node 9, only reachable via a unidirectional neighbor, has
        // no route at all.
        assert!(!routes.contains_key(&id(9)));
    }
}
