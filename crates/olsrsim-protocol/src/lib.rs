//! Per-node state machine for the simplified OLSR protocol.
//!
//! Everything here is pure and synchronous: neighbor tables, multipoint
//! relay selection, the topology table, routing-table derivation, and the
//! per-tick engine. The async shell that drives an engine at the tick
//! cadence lives in the simulator crate.

pub mod constants;
pub mod engine;
pub mod mpr;
pub mod neighbors;
pub mod routing;
pub mod topology_table;

pub use engine::{NodeEngine, NodeMessage, TickOutput};
pub use neighbors::{NeighborState, OneHopNeighbor, OneHopTable, TwoHopTable};
pub use routing::{Route, RoutingTable};
pub use topology_table::{TopologyEntry, TopologyTable};
