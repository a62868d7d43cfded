//! The three protocol message variants and their canonical textual forms.
//!
//! The canonical strings are both the per-node log format and the
//! regression oracle; field order and spacing are fixed.

use core::fmt;

use crate::types::NodeId;

/// Periodic one-hop discovery broadcast.
///
/// The three lists partition the sender's currently known one-hop
/// neighbors; the sender's own id never appears in any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloMessage {
    pub source: NodeId,
    pub unidirectional: Vec<NodeId>,
    pub bidirectional: Vec<NodeId>,
    pub mpr: Vec<NodeId>,
    /// Receivers drop HELLOs whose sequence is not newer than the last
    /// observed from the same source. Not rendered in the canonical form.
    pub sequence: u64,
}

/// Multi-hop advertisement of the originator's MPR-selector set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcMessage {
    /// The originator, carried verbatim while the message is forwarded.
    pub source: NodeId,
    /// The immediate previous hop, rewritten by each forwarder.
    pub from_neighbor: NodeId,
    pub sequence: u64,
    /// The originator's MPR-selector set, in ascending id order.
    pub ms_set: Vec<NodeId>,
}

/// Unicast application payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMessage {
    pub source: NodeId,
    pub destination: NodeId,
    /// The neighbor the packet is addressed to for this hop.
    pub next_hop: NodeId,
    /// The immediate previous hop, rewritten by each forwarder.
    pub from_neighbor: NodeId,
    pub payload: String,
}

/// A transmission on the shared medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Hello(HelloMessage),
    Tc(TcMessage),
    Data(DataMessage),
}

impl Message {
    /// The node that physically transmitted this message: the
    /// from-neighbor for forwarded variants, the source for HELLO.
    #[must_use]
    pub fn transmitter(&self) -> NodeId {
        match self {
            Message::Hello(m) => m.source,
            Message::Tc(m) => m.from_neighbor,
            Message::Data(m) => m.from_neighbor,
        }
    }
}

fn fmt_ids(f: &mut fmt::Formatter<'_>, ids: &[NodeId]) -> fmt::Result {
    for id in ids {
        write!(f, " {id}")?;
    }
    Ok(())
}

impl fmt::Display for HelloMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {} HELLO UNIDIR", self.source)?;
        fmt_ids(f, &self.unidirectional)?;
        write!(f, " BIDIR")?;
        fmt_ids(f, &self.bidirectional)?;
        write!(f, " MPR")?;
        fmt_ids(f, &self.mpr)
    }
}

impl fmt::Display for TcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "* {} TC {} {} MS",
            self.from_neighbor, self.source, self.sequence
        )?;
        fmt_ids(f, &self.ms_set)
    }
}

impl fmt::Display for DataMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} DATA {} {} {}",
            self.next_hop, self.from_neighbor, self.source, self.destination, self.payload
        )
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Hello(m) => fmt::Display::fmt(m, f),
            Message::Tc(m) => fmt::Display::fmt(m, f),
            Message::Data(m) => fmt::Display::fmt(m, f),
        }
    }
}
