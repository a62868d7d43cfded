//! Core data model for the olsrsim ad-hoc mesh simulator.
//!
//! Node identifiers and ticks, the three protocol message variants with
//! their canonical textual forms, time-indexed link states, and the
//! topology oracle the controller consults on every delivery.

pub mod error;
pub mod link;
pub mod message;
pub mod topology;
pub mod types;

pub use error::{LinkStateParseError, TopologyError};
pub use link::{Link, LinkState, LinkStatus};
pub use message::{DataMessage, HelloMessage, Message, TcMessage};
pub use topology::NetworkTopology;
pub use types::{NodeId, Tick};
