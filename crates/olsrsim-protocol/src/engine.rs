//! The per-node protocol engine.
//!
//! [`NodeEngine`] is the pure state machine: one [`step`](NodeEngine::step)
//! per tick, fed at most one inbound message, returning what the node
//! transmitted and which application payloads terminated here. The async
//! shell that drives an engine against a real clock and real log sinks
//! lives in the simulator crate, which keeps every protocol rule testable
//! against a synthetic clock.

use std::collections::{BTreeMap, BTreeSet};

use olsrsim_core::{DataMessage, HelloMessage, Message, NodeId, TcMessage, Tick};

use crate::constants::{
    DATA_RETRY_DELAY, HELLO_PERIOD, NEIGHBOR_HOLD_TIME, TC_PERIOD, TOPOLOGY_HOLD_TIME,
};
use crate::neighbors::{self, NeighborState, OneHopTable, TwoHopTable};
use crate::routing::{self, RoutingTable};
use crate::topology_table::{self, TopologyTable};
use crate::mpr;

/// The application payload a node is configured to originate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMessage {
    pub payload: String,
    /// Tick at which to attempt origination; pushed back by
    /// [`DATA_RETRY_DELAY`] while no route exists.
    pub delay: Tick,
    pub destination: NodeId,
    pub sent: bool,
}

/// Everything a node did during one tick.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickOutput {
    /// Messages transmitted onto the shared medium, in emission order.
    pub sent: Vec<Message>,
    /// DATA payloads that terminated at this node.
    pub delivered: Vec<String>,
}

/// Per-node OLSR state machine.
pub struct NodeEngine {
    id: NodeId,
    current_tick: Tick,
    node_msg: Option<NodeMessage>,

    one_hop: OneHopTable,
    two_hop: TwoHopTable,
    /// Neighbors that selected us as one of their MPRs.
    ms_set: BTreeSet<NodeId>,
    topology: TopologyTable,
    routing: RoutingTable,
    routes_changed: bool,

    hello_sequence: u64,
    tc_sequence: u64,
    /// Last HELLO sequence observed per sender.
    hello_seen: BTreeMap<NodeId, u64>,
}

impl NodeEngine {
    pub fn new(id: NodeId, node_msg: Option<NodeMessage>) -> Self {
        Self {
            id,
            current_tick: 0,
            node_msg,
            one_hop: OneHopTable::new(),
            two_hop: TwoHopTable::new(),
            ms_set: BTreeSet::new(),
            topology: TopologyTable::new(),
            routing: RoutingTable::new(),
            routes_changed: true,
            hello_sequence: 0,
            tc_sequence: 0,
            hello_seen: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    #[must_use]
    pub fn one_hop(&self) -> &OneHopTable {
        &self.one_hop
    }

    #[must_use]
    pub fn two_hop(&self) -> &TwoHopTable {
        &self.two_hop
    }

    #[must_use]
    pub fn ms_set(&self) -> &BTreeSet<NodeId> {
        &self.ms_set
    }

    #[must_use]
    pub fn topology(&self) -> &TopologyTable {
        &self.topology
    }

    #[must_use]
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing
    }

    /// Advance one tick.
    ///
    /// In order: ingest at most one inbound message, emit the periodic
    /// HELLO and TC when due, attempt the scheduled DATA origination,
    /// expire stale table entries, and rebuild the routing table when a
    /// handler flagged a change.
    pub fn step(&mut self, inbound: Option<Message>) -> TickOutput {
        let mut out = TickOutput::default();

        if let Some(msg) = inbound {
            self.handle(msg, &mut out);
        }

        if self.current_tick % HELLO_PERIOD == 0 {
            out.sent.push(Message::Hello(self.make_hello()));
        }
        if self.current_tick % TC_PERIOD == 0 && !self.ms_set.is_empty() {
            out.sent.push(Message::Tc(self.make_tc()));
        }
        self.maybe_originate_data(&mut out);

        neighbors::expire_neighbors(&mut self.one_hop, &mut self.two_hop, self.current_tick);
        topology_table::expire_topology(&mut self.topology, self.current_tick);

        if self.routes_changed {
            self.routing = routing::build_routing_table(&self.one_hop, &self.two_hop, &self.topology);
            self.routes_changed = false;
        }

        self.current_tick += 1;
        out
    }

    /// Partition the one-hop table into the three HELLO lists and attach
    /// the next sequence number.
    fn make_hello(&mut self) -> HelloMessage {
        let mut unidirectional = Vec::new();
        let mut bidirectional = Vec::new();
        let mut mpr = Vec::new();
        for entry in self.one_hop.values() {
            match entry.state {
                NeighborState::Unidirectional => unidirectional.push(entry.neighbor),
                NeighborState::Bidirectional => bidirectional.push(entry.neighbor),
                NeighborState::Mpr => mpr.push(entry.neighbor),
            }
        }

        let sequence = self.hello_sequence;
        self.hello_sequence += 1;

        HelloMessage {
            source: self.id,
            unidirectional,
            bidirectional,
            mpr,
            sequence,
        }
    }

    /// Advertise the current MPR-selector set, in ascending id order.
    fn make_tc(&mut self) -> TcMessage {
        let sequence = self.tc_sequence;
        self.tc_sequence += 1;

        TcMessage {
            source: self.id,
            from_neighbor: self.id,
            sequence,
            ms_set: self.ms_set.iter().copied().collect(),
        }
    }

    /// Originate the configured DATA message once its delay expires. With
    /// no route to the destination the attempt is pushed back rather than
    /// failed.
    fn maybe_originate_data(&mut self, out: &mut TickOutput) {
        let Some(msg) = self.node_msg.as_mut() else {
            return;
        };
        if msg.sent || self.current_tick != msg.delay {
            return;
        }

        match self.routing.get(&msg.destination) {
            Some(route) => {
                out.sent.push(Message::Data(DataMessage {
                    source: self.id,
                    destination: msg.destination,
                    next_hop: route.next_hop,
                    from_neighbor: self.id,
                    payload: msg.payload.clone(),
                }));
                msg.sent = true;
            }
            None => {
                msg.delay += DATA_RETRY_DELAY;
            }
        }
    }

    fn handle(&mut self, msg: Message, out: &mut TickOutput) {
        match msg {
            Message::Hello(hello) => self.handle_hello(&hello),
            Message::Tc(tc) => self.handle_tc(tc, out),
            Message::Data(data) => self.handle_data(data, out),
        }
    }

    fn handle_hello(&mut self, msg: &HelloMessage) {
        // Stale or duplicate sequence numbers are the designated defense
        // against router-helper reordering.
        if let Some(&last) = self.hello_seen.get(&msg.source) {
            if msg.sequence <= last {
                return;
            }
        }
        self.hello_seen.insert(msg.source, msg.sequence);

        let hold_until = self.current_tick + NEIGHBOR_HOLD_TIME;
        neighbors::update_one_hop(&mut self.one_hop, msg, hold_until, self.id);
        neighbors::update_two_hop(&mut self.two_hop, msg, self.id);
        mpr::select_mprs(&mut self.one_hop, &self.two_hop);

        // We are in the sender's selector set iff it names us as an MPR.
        if msg.mpr.contains(&self.id) {
            self.ms_set.insert(msg.source);
        } else {
            self.ms_set.remove(&msg.source);
        }

        self.routes_changed = true;
    }

    fn handle_tc(&mut self, mut msg: TcMessage, out: &mut TickOutput) {
        if msg.source == self.id {
            return;
        }

        let hold_until = self.current_tick + TOPOLOGY_HOLD_TIME;
        if !topology_table::apply_tc(&mut self.topology, &msg, hold_until, self.id) {
            // Out-of-order relative to recorded state: drop whole.
            return;
        }
        self.routes_changed = true;

        // Forward only on behalf of neighbors that selected us as an MPR.
        if !self.ms_set.contains(&msg.from_neighbor) {
            return;
        }
        msg.from_neighbor = self.id;
        out.sent.push(Message::Tc(msg));
    }

    fn handle_data(&mut self, mut msg: DataMessage, out: &mut TickOutput) {
        if msg.destination == self.id {
            out.delivered.push(msg.payload);
            return;
        }

        // Forward if a route exists; otherwise the packet dies here.
        let Some(route) = self.routing.get(&msg.destination) else {
            return;
        };
        msg.from_neighbor = self.id;
        msg.next_hop = route.next_hop;
        out.sent.push(Message::Data(msg));
    }
}
